//! TSIG signing key

use crate::error::{Error, Result};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hickory_client::rr::Name;
use std::fmt;
use std::str::FromStr;

/// HMAC algorithms accepted for TSIG keys
///
/// Only algorithms the signing backend implements are listed; `hmac-md5`,
/// `hmac-sha1` and `hmac-sha224` keys are rejected when parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TsigAlgorithm {
    #[default]
    HmacSha256,
    HmacSha384,
    HmacSha512,
}

impl TsigAlgorithm {
    /// Algorithm name as used in key files and TSIG records
    pub fn as_str(&self) -> &'static str {
        match self {
            TsigAlgorithm::HmacSha256 => "hmac-sha256",
            TsigAlgorithm::HmacSha384 => "hmac-sha384",
            TsigAlgorithm::HmacSha512 => "hmac-sha512",
        }
    }
}

impl FromStr for TsigAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // "hmac-sha256." is the same algorithm written as a domain name
        match s.trim().trim_end_matches('.').to_ascii_lowercase().as_str() {
            "hmac-sha256" => Ok(TsigAlgorithm::HmacSha256),
            "hmac-sha384" => Ok(TsigAlgorithm::HmacSha384),
            "hmac-sha512" => Ok(TsigAlgorithm::HmacSha512),
            other => Err(Error::signing_key(format!(
                "unsupported TSIG algorithm {other:?}"
            ))),
        }
    }
}

impl fmt::Display for TsigAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named shared secret used to sign update transactions
///
/// Built once from configuration and only ever borrowed afterwards.
///
/// # Security
///
/// The Debug implementation does NOT expose the secret.
#[derive(Clone)]
pub struct SigningKey {
    name: Name,
    algorithm: TsigAlgorithm,
    secret: Vec<u8>,
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("name", &self.name)
            .field("algorithm", &self.algorithm)
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

impl SigningKey {
    /// Create a key from raw secret bytes
    pub fn new(name: &str, algorithm: TsigAlgorithm, secret: Vec<u8>) -> Result<Self> {
        let mut key_name = Name::from_ascii(name.trim())
            .map_err(|e| Error::signing_key(format!("invalid key name {name:?}: {e}")))?;
        key_name.set_fqdn(true);

        if key_name.is_root() {
            return Err(Error::signing_key("key name cannot be the root"));
        }
        if secret.is_empty() {
            return Err(Error::signing_key(format!("key {name:?} has an empty secret")));
        }

        Ok(Self {
            name: key_name,
            algorithm,
            secret,
        })
    }

    /// Create a key from a base64-encoded secret
    pub fn from_base64(name: &str, algorithm: TsigAlgorithm, secret: &str) -> Result<Self> {
        let secret = BASE64
            .decode(secret.trim())
            .map_err(|e| Error::signing_key(format!("secret of key {name:?} is not base64: {e}")))?;
        Self::new(name, algorithm, secret)
    }

    /// Key name
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// HMAC algorithm
    pub fn algorithm(&self) -> TsigAlgorithm {
        self.algorithm
    }

    /// Raw secret bytes
    ///
    /// ⚠️ NEVER log this value
    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}
