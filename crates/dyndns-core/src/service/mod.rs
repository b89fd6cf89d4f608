//! Transport-agnostic handling of client update requests
//!
//! The HTTP daemon decodes a request into an [`UpdateRequest`], calls
//! [`UpdateService::handle`] and renders the returned [`UpdateReply`].
//! Checks run in a fixed order, and the first failing check decides the
//! reply:
//!
//! 1. domain is managed ([`UpdateReply::DomainNotFound`])
//! 2. credentials present ([`UpdateReply::LoginRequired`])
//! 3. credentials valid ([`UpdateReply::Forbidden`])
//! 4. at least one address ([`UpdateReply::MissingAddress`])
//! 5. addresses valid ([`UpdateReply::InvalidIpv4`] / [`UpdateReply::InvalidIpv6`])
//! 6. coordinator run

pub mod address;

use crate::auth::ConfigAuthorizer;
use crate::config::ServiceConfig;
use crate::coordinator::{DomainUpdateCoordinator, UpdateStatus};
use crate::dns::{ServerResolver, TcpUpdateTransport, tsigner};
use crate::error::{Error, Result};
use crate::traits::DomainAuthorizer;
use crate::update::{SigningKey, UpdateTransmitter};
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Basic authentication credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// A decoded client request
///
/// Parameters are kept as raw text; an empty but present parameter is
/// different from a missing one.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub domain: Option<String>,
    pub ip4: Option<String>,
    pub ip6: Option<String>,
    pub credentials: Option<Credentials>,
}

/// Outcome of a request, ready to be rendered by a front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateReply {
    Updated,
    NothingToDo,
    DomainNotFound,
    LoginRequired { realm: String },
    Forbidden,
    MissingAddress,
    InvalidIpv4,
    InvalidIpv6,
    UpdateFailed,
    ApplicationError,
}

impl UpdateReply {
    /// HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            UpdateReply::Updated | UpdateReply::NothingToDo => 200,
            UpdateReply::DomainNotFound => 404,
            UpdateReply::LoginRequired { .. } => 401,
            UpdateReply::Forbidden => 403,
            UpdateReply::MissingAddress
            | UpdateReply::InvalidIpv4
            | UpdateReply::InvalidIpv6
            | UpdateReply::UpdateFailed => 400,
            UpdateReply::ApplicationError => 500,
        }
    }

    /// Plain-text body
    pub fn body(&self) -> &'static str {
        match self {
            UpdateReply::Updated => "ok",
            UpdateReply::NothingToDo => "nothing to do",
            UpdateReply::DomainNotFound => "domain not found",
            UpdateReply::LoginRequired { .. } => "login required",
            UpdateReply::Forbidden => "forbidden",
            UpdateReply::MissingAddress => "need at least IPv4 or IPv6 address",
            UpdateReply::InvalidIpv4 => "invalid IPv4 address",
            UpdateReply::InvalidIpv6 => "invalid IPv6 address",
            UpdateReply::UpdateFailed => "update failed",
            UpdateReply::ApplicationError => "application error",
        }
    }

    /// `WWW-Authenticate` challenge, for replies that ask for credentials
    pub fn challenge(&self) -> Option<String> {
        match self {
            UpdateReply::LoginRequired { realm } => Some(format!("Basic realm=\"{realm}\"")),
            _ => None,
        }
    }
}

/// Authorizes requests and runs the coordinator for them
///
/// Immutable after construction; share it across connections with `Arc`.
pub struct UpdateService {
    authorizer: Arc<dyn DomainAuthorizer>,
    coordinator: DomainUpdateCoordinator,
    key: SigningKey,
    server: SocketAddr,
    realm: String,
    require_public_addresses: bool,
}

impl UpdateService {
    /// Create a service from explicit collaborators
    pub fn new(
        config: &ServiceConfig,
        authorizer: Arc<dyn DomainAuthorizer>,
        coordinator: DomainUpdateCoordinator,
    ) -> Result<Self> {
        Ok(Self {
            authorizer,
            coordinator,
            key: config.signing_key()?,
            server: config.server_addr(),
            realm: config.realm.clone(),
            require_public_addresses: config.require_public_addresses,
        })
    }

    /// Create a service talking to the configured DNS server
    ///
    /// Fails early when the configured key cannot be used for signing.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        tsigner(&config.signing_key()?)?;

        let resolver = ServerResolver::new(config.timeouts.resolve());
        let transport = TcpUpdateTransport::new(config.timeouts.update());
        let coordinator = DomainUpdateCoordinator::new(
            Box::new(resolver),
            UpdateTransmitter::new(Box::new(transport)),
        );
        let authorizer = ConfigAuthorizer::new(config.domains.clone());

        Self::new(config, Arc::new(authorizer), coordinator)
    }

    /// Handle one request
    pub async fn handle(&self, request: UpdateRequest) -> UpdateReply {
        let domain = request.domain.unwrap_or_default();

        if !self.authorizer.is_accepted_domain(&domain) {
            return UpdateReply::DomainNotFound;
        }

        let Some(credentials) = request.credentials else {
            return UpdateReply::LoginRequired {
                realm: self.realm.clone(),
            };
        };

        match self.check_credentials(&domain, credentials).await {
            Ok(true) => {}
            Ok(false) => {
                warn!("{}: rejected credentials", domain);
                return UpdateReply::Forbidden;
            }
            Err(e) => {
                warn!("{}: credential check failed: {}", domain, e);
                return UpdateReply::ApplicationError;
            }
        }

        if request.ip4.is_none() && request.ip6.is_none() {
            error!("{}: no IPv4 or IPv6 address given", domain);
            return UpdateReply::MissingAddress;
        }

        let ip4 = match request.ip4.as_deref() {
            None => None,
            Some(text) => match address::parse_ipv4(text, self.require_public_addresses) {
                Some(ip) => Some(ip),
                None => {
                    error!("{}: invalid IPv4 address {:?}", domain, text);
                    return UpdateReply::InvalidIpv4;
                }
            },
        };

        let ip6 = match request.ip6.as_deref() {
            None => None,
            Some(text) => match address::parse_ipv6(text, self.require_public_addresses) {
                Some(ip) => Some(ip),
                None => {
                    error!("{}: invalid IPv6 address {:?}", domain, text);
                    return UpdateReply::InvalidIpv6;
                }
            },
        };

        let real_domain = self.authorizer.real_domain(&domain);

        match self
            .coordinator
            .update(&real_domain, &self.key, self.server, ip4, ip6)
            .await
        {
            Ok(UpdateStatus::Updated) => {
                info!(
                    "domain {} updated: IPv4: {}, IPv6: {}",
                    domain,
                    ip4.map_or_else(|| "-".to_string(), |ip| ip.to_string()),
                    ip6.map_or_else(|| "-".to_string(), |ip| ip.to_string())
                );
                UpdateReply::Updated
            }
            Ok(UpdateStatus::NothingToDo) => {
                info!("domain {} not updated", real_domain);
                UpdateReply::NothingToDo
            }
            Err(e @ Error::UpdateFailed { .. }) => {
                error!("{}: DNS update failed: {}", real_domain, e);
                UpdateReply::UpdateFailed
            }
            Err(e) => {
                if e.is_update_failure() {
                    error!("{}: DNS update failed: {}", real_domain, e);
                } else {
                    warn!("{}: {}", real_domain, e);
                }
                UpdateReply::ApplicationError
            }
        }
    }

    /// Runs the argon2 check on the blocking pool
    async fn check_credentials(&self, domain: &str, credentials: Credentials) -> Result<bool> {
        let authorizer = Arc::clone(&self.authorizer);
        let domain = domain.to_string();

        tokio::task::spawn_blocking(move || {
            authorizer.is_client_authorized(&domain, &credentials.username, &credentials.password)
        })
        .await
        .map_err(|e| Error::auth(format!("credential check task failed: {e}")))?
    }
}
