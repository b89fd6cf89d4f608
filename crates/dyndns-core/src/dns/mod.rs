//! hickory-backed implementations of the DNS seams
//!
//! - [`ServerResolver`]: UDP queries against the configured server, TCP on
//!   truncation
//! - [`TcpUpdateTransport`]: TSIG-signed UPDATE over TCP
//! - [`update_message`]: RFC 2136 encoding of a transaction
//!
//! Both network parts run hickory's sync client on the blocking pool and
//! await it to completion. Deadlines are the client connection's own
//! timeouts, so no exchange is still running once a result is reported.

pub mod message;
pub mod resolver;
pub mod transport;
pub mod tsig;

#[cfg(test)]
mod loopback;

pub use hickory_client::op::ResponseCode;
pub use hickory_client::rr::Name;
pub use message::{current_address, update_message};
pub use resolver::ServerResolver;
pub use transport::TcpUpdateTransport;
pub use tsig::{TSIG_FUDGE_SECS, tsigner};

use hickory_client::error::{ClientError, ClientErrorKind};
use hickory_proto::error::ProtoErrorKind;
use std::io;

/// Whether a client error means the connection's deadline elapsed
fn timed_out(error: &ClientError) -> bool {
    match error.kind() {
        ClientErrorKind::Timeout => true,
        ClientErrorKind::Proto(e) => matches!(e.kind(), ProtoErrorKind::Timeout),
        ClientErrorKind::Io(e) => e.kind() == io::ErrorKind::TimedOut,
        _ => false,
    }
}
