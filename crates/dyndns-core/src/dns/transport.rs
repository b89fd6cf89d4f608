//! Signed UPDATE exchange over TCP

use super::message::update_message;
use super::timed_out;
use super::tsig::tsigner;
use crate::error::{Error, Operation, Result};
use crate::traits::UpdateTransport;
use crate::update::UpdateTransaction;
use async_trait::async_trait;
use hickory_client::client::{Client, SyncClient};
use hickory_client::error::ClientError;
use hickory_client::op::ResponseCode;
use hickory_client::tcp::TcpClientConnection;
use hickory_proto::xfer::{DnsRequest, DnsRequestOptions};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

/// Sends TSIG-signed UPDATE messages over TCP, one connection per update
///
/// Responses are verified against the same key; an unsigned or badly
/// signed answer is a transport error.
///
/// The timeout bounds connecting and waiting for the answer. It is enforced
/// by the connection, so the exchange is over when `exchange` returns. A
/// [`Error::Timeout`] is still ambiguous when the message went out and the
/// answer never came back: the server may have applied the update.
pub struct TcpUpdateTransport {
    timeout: Duration,
}

impl TcpUpdateTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl UpdateTransport for TcpUpdateTransport {
    async fn exchange(
        &self,
        transaction: &UpdateTransaction<'_>,
        server: SocketAddr,
    ) -> Result<ResponseCode> {
        let message = update_message(transaction);
        let signer = tsigner(transaction.signing_key())?;
        let timeout = self.timeout;

        let rcode = tokio::task::spawn_blocking(move || -> Result<ResponseCode> {
            let conn = TcpClientConnection::with_timeout(server, timeout)
                .map_err(|e| exchange_error(e, server, timeout))?;
            let client = SyncClient::with_tsigner(conn, signer);
            let request = DnsRequest::new(message, DnsRequestOptions::default());

            let response = client
                .send(request)
                .into_iter()
                .next()
                .ok_or_else(|| Error::transport(format!("no response from {server}")))?
                .map_err(|e| exchange_error(e, server, timeout))?;

            Ok(response.response_code())
        })
        .await
        .map_err(|e| Error::transport(format!("update task failed: {e}")))??;

        debug!("Server {} answered UPDATE with {}", server, rcode);
        Ok(rcode)
    }
}

fn exchange_error(error: ClientError, server: SocketAddr, timeout: Duration) -> Error {
    if timed_out(&error) {
        Error::timeout(Operation::Update, timeout)
    } else {
        Error::transport(format!("exchange with {server} failed: {error}"))
    }
}
