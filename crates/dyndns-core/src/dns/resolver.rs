//! Current-state lookups against the configured server

use super::message::current_address;
use super::timed_out;
use crate::error::{Error, Operation, Result};
use crate::traits::AddressResolver;
use crate::update::{AddressRecordType, CurrentAddress};
use async_trait::async_trait;
use hickory_client::client::{Client, ClientConnection, SyncClient};
use hickory_client::error::ClientError;
use hickory_client::rr::{DNSClass, Name};
use hickory_client::tcp::TcpClientConnection;
use hickory_client::udp::UdpClientConnection;
use hickory_proto::xfer::DnsResponse;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

/// Queries the configured server directly
///
/// The question goes out over UDP and is asked again over TCP when the
/// answer comes back truncated. The system resolver is never consulted.
pub struct ServerResolver {
    timeout: Duration,
}

impl ServerResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl AddressResolver for ServerResolver {
    async fn resolve(
        &self,
        name: &Name,
        record_type: AddressRecordType,
        server: SocketAddr,
    ) -> Result<CurrentAddress> {
        debug!("Querying {} {} at {}", name, record_type, server);

        let name = name.clone();
        let timeout = self.timeout;

        tokio::task::spawn_blocking(move || lookup(&name, record_type, server, timeout))
            .await
            .map_err(|e| Error::resolve(format!("query task failed: {e}")))?
    }
}

fn lookup(
    name: &Name,
    record_type: AddressRecordType,
    server: SocketAddr,
    timeout: Duration,
) -> Result<CurrentAddress> {
    let conn = UdpClientConnection::with_timeout(server, timeout)
        .map_err(|e| query_error(e, name, timeout))?;
    let mut response = query(conn, name, record_type).map_err(|e| query_error(e, name, timeout))?;

    if response.truncated() {
        debug!("Answer for {} {} truncated, asking over TCP", name, record_type);
        let conn = TcpClientConnection::with_timeout(server, timeout)
            .map_err(|e| query_error(e, name, timeout))?;
        response = query(conn, name, record_type).map_err(|e| query_error(e, name, timeout))?;
    }

    current_address(&response, record_type)
}

fn query<C: ClientConnection>(
    conn: C,
    name: &Name,
    record_type: AddressRecordType,
) -> std::result::Result<DnsResponse, ClientError> {
    SyncClient::new(conn).query(name, DNSClass::IN, record_type.record_type())
}

fn query_error(error: ClientError, name: &Name, timeout: Duration) -> Error {
    if timed_out(&error) {
        Error::timeout(Operation::Resolve, timeout)
    } else {
        Error::resolve(format!("query for {name} failed: {error}"))
    }
}
