//! Error types for the dynamic DNS update service
//!
//! This module defines all error types used throughout the crate.

use hickory_client::op::ResponseCode;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for dynamic DNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Network operation of an update that can run out of time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Current-state query
    Resolve,
    /// Signed UPDATE exchange
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Resolve => f.write_str("resolve"),
            Operation::Update => f.write_str("update"),
        }
    }
}

/// Core error type for the dynamic DNS update service
#[derive(Error, Debug)]
pub enum Error {
    /// The target name cannot be split into zone and host, or an owner name
    /// lies outside the zone of the transaction
    #[error("Invalid domain name: {0}")]
    InvalidName(String),

    /// An address is neither IPv4 nor IPv6, or does not match the record
    /// type it is used for
    #[error("Unsupported address family: {0}")]
    UnsupportedAddressFamily(String),

    /// The current-state query against the DNS server failed
    #[error("Resolve error: {0}")]
    Resolve(String),

    /// Transmit was called on a transaction without pending changes
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The server answered the update with a non-NOERROR response code
    #[error("DNS update failed with response code: {rcode}")]
    UpdateFailed {
        /// Raw response code returned by the server
        rcode: ResponseCode,
    },

    /// The update exchange failed below the DNS layer (connection, framing,
    /// malformed or unsigned response)
    #[error("DNS update transport error: {0}")]
    Transport(String),

    /// A network operation did not complete within its deadline
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// The operation that timed out
        operation: Operation,
        /// The deadline that elapsed
        after: Duration,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// TSIG key errors
    #[error("Signing key error: {0}")]
    SigningKey(String),

    /// Credential store errors (not a failed login, which is `Ok(false)`)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create an invalid name error
    pub fn invalid_name(msg: impl Into<String>) -> Self {
        Self::InvalidName(msg.into())
    }

    /// Create an unsupported address family error
    pub fn unsupported_family(msg: impl Into<String>) -> Self {
        Self::UnsupportedAddressFamily(msg.into())
    }

    /// Create a resolve error
    pub fn resolve(msg: impl Into<String>) -> Self {
        Self::Resolve(msg.into())
    }

    /// Create a precondition error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a signing key error
    pub fn signing_key(msg: impl Into<String>) -> Self {
        Self::SigningKey(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(operation: Operation, after: Duration) -> Self {
        Self::Timeout { operation, after }
    }

    /// Whether the error means the update itself was attempted and failed
    ///
    /// Covers a server rejection as well as a failed exchange. In both cases
    /// the zone is left as it was: prerequisites keep the server from
    /// committing a partial write.
    pub fn is_update_failure(&self) -> bool {
        matches!(
            self,
            Error::UpdateFailed { .. }
                | Error::Transport(_)
                | Error::Timeout {
                    operation: Operation::Update,
                    ..
                }
        )
    }
}
