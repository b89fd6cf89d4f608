//! Configuration types for the dynamic DNS update service
//!
//! The service is configured from one YAML file:
//!
//! ```yaml
//! realm: DynDNS
//! dnsserver: 192.0.2.53
//! tsig:
//!   name: update-key.
//!   secret: c2VjcmV0LXNpZ25pbmcta2V5
//!   algorithm: hmac-sha256
//! domains:
//!   home.example.com:
//!     username: alice
//!     password: $argon2id$v=19$...
//!     domain: home.dyn.example.com
//! ```

use crate::dns::tsigner;
use crate::error::{Error, Result};
use crate::update::{DomainTarget, SigningKey, TsigAlgorithm};
use argon2::PasswordHash;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Realm announced in Basic authentication challenges
    #[serde(default = "default_realm")]
    pub realm: String,

    /// Address of the authoritative DNS server
    pub dnsserver: IpAddr,

    /// Port of the authoritative DNS server
    #[serde(default = "default_dns_port")]
    pub dnsport: u16,

    /// TSIG key used to sign every update
    pub tsig: TsigConfig,

    /// Managed domains, keyed by the name clients send
    #[serde(default)]
    pub domains: HashMap<String, DomainConfig>,

    /// Network deadlines
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Reject addresses that are not globally routable
    #[serde(default = "default_require_public_addresses")]
    pub require_public_addresses: bool,
}

impl ServiceConfig {
    /// Read, parse and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Parse and validate a configuration document
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.realm.is_empty() || self.realm.contains('"') {
            return Err(Error::config(format!("invalid realm {:?}", self.realm)));
        }

        if self.dnsserver.is_unspecified() {
            return Err(Error::config("dnsserver must be a concrete address"));
        }

        if self.dnsport == 0 {
            return Err(Error::config("dnsport cannot be 0"));
        }

        tsigner(&self.signing_key()?)?;
        self.timeouts.validate()?;

        if self.domains.is_empty() {
            return Err(Error::config("No domains configured"));
        }

        for (name, domain) in &self.domains {
            domain.validate(name)?;
        }

        Ok(())
    }

    /// Build the signing key from the `tsig` section
    pub fn signing_key(&self) -> Result<SigningKey> {
        self.tsig.signing_key()
    }

    /// Socket address updates and queries are sent to
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.dnsserver, self.dnsport)
    }
}

/// TSIG key configuration
///
/// # Security
///
/// The Debug implementation does NOT expose the secret.
#[derive(Clone, Serialize, Deserialize)]
pub struct TsigConfig {
    /// Key name, as known to the DNS server
    pub name: String,

    /// Base64-encoded shared secret
    pub secret: String,

    /// HMAC algorithm name
    #[serde(default = "default_tsig_algorithm")]
    pub algorithm: String,
}

impl TsigConfig {
    fn signing_key(&self) -> Result<SigningKey> {
        let algorithm: TsigAlgorithm = self.algorithm.parse()?;
        SigningKey::from_base64(&self.name, algorithm, &self.secret)
    }
}

impl fmt::Debug for TsigConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsigConfig")
            .field("name", &self.name)
            .field("secret", &"<REDACTED>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Credentials and target of one managed domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    /// The only user allowed to update the domain
    pub username: String,

    /// argon2 PHC hash of the user's password
    pub password: String,

    /// Name actually updated in DNS, when it differs from the public one
    #[serde(default)]
    pub domain: Option<String>,
}

impl DomainConfig {
    fn validate(&self, name: &str) -> Result<()> {
        if self.username.is_empty() {
            return Err(Error::config(format!("domain {name}: username is empty")));
        }

        PasswordHash::new(&self.password).map_err(|e| {
            Error::config(format!("domain {name}: password is not an argon2 hash: {e}"))
        })?;

        let real = self.domain.as_deref().unwrap_or(name);
        DomainTarget::parse(real)
            .map_err(|e| Error::config(format!("domain {name}: {e}")))?;

        Ok(())
    }
}

/// Deadlines for the two network operations of an update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Current-state query deadline (seconds)
    #[serde(default = "default_resolve_secs")]
    pub resolve_secs: u64,

    /// Update exchange deadline (seconds)
    #[serde(default = "default_update_secs")]
    pub update_secs: u64,
}

impl TimeoutConfig {
    pub fn resolve(&self) -> Duration {
        Duration::from_secs(self.resolve_secs)
    }

    pub fn update(&self) -> Duration {
        Duration::from_secs(self.update_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.resolve_secs == 0 || self.update_secs == 0 {
            return Err(Error::config("timeouts must be at least one second"));
        }
        Ok(())
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            resolve_secs: default_resolve_secs(),
            update_secs: default_update_secs(),
        }
    }
}

fn default_realm() -> String {
    "DynDNS".to_string()
}

fn default_dns_port() -> u16 {
    53
}

fn default_tsig_algorithm() -> String {
    TsigAlgorithm::default().as_str().to_string()
}

fn default_require_public_addresses() -> bool {
    true
}

fn default_resolve_secs() -> u64 {
    5
}

fn default_update_secs() -> u64 {
    10
}
