// # Update Transport Trait
//
// Defines the wire exchange of a signed UPDATE message with the
// authoritative server.
//
// ## Implementations
//
// - TCP with TSIG via hickory: `crate::dns::TcpUpdateTransport`
// - Recording doubles in the contract tests

use crate::update::UpdateTransaction;
use async_trait::async_trait;
use hickory_client::op::ResponseCode;
use std::net::SocketAddr;

/// Trait for sending an update transaction and returning the server's answer
///
/// # Contract
///
/// - One message per call, over a reliable (connection-oriented) transport.
/// - The message is signed with the transaction's key.
/// - Return the top-level response code as received; classifying it is the
///   transmitter's job.
/// - Connection failures, malformed or unverifiable responses are
///   `Err(Error::Transport)`, an elapsed deadline is `Err(Error::Timeout)`.
/// - No retries.
#[async_trait]
pub trait UpdateTransport: Send + Sync {
    /// Send `transaction` to `server` and return the response code
    async fn exchange(
        &self,
        transaction: &UpdateTransaction<'_>,
        server: SocketAddr,
    ) -> Result<ResponseCode, crate::Error>;
}
