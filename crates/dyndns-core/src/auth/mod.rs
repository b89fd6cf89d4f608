//! Credential checks backed by the `domains` configuration section
//!
//! Passwords are stored as argon2 PHC strings (`$argon2id$v=19$...`).
//! [`hash_password`] produces them; the `dyndns-passwd` tool wraps it.

use crate::config::DomainConfig;
use crate::error::{Error, Result};
use crate::traits::DomainAuthorizer;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::collections::HashMap;

/// Hash `password` into an argon2id PHC string with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::auth(format!("cannot hash password: {e}")))
}

/// [`DomainAuthorizer`] over the configured domains
#[derive(Debug, Clone)]
pub struct ConfigAuthorizer {
    domains: HashMap<String, DomainConfig>,
}

impl ConfigAuthorizer {
    pub fn new(domains: HashMap<String, DomainConfig>) -> Self {
        Self { domains }
    }
}

impl DomainAuthorizer for ConfigAuthorizer {
    fn is_accepted_domain(&self, domain: &str) -> bool {
        self.domains.contains_key(domain)
    }

    fn is_client_authorized(&self, domain: &str, username: &str, password: &str) -> Result<bool> {
        let Some(entry) = self.domains.get(domain) else {
            return Ok(false);
        };

        if entry.username != username {
            return Ok(false);
        }

        let hash = PasswordHash::new(&entry.password)
            .map_err(|e| Error::auth(format!("invalid password hash for {domain}: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::auth(format!(
                "cannot verify password for {domain}: {e}"
            ))),
        }
    }

    fn real_domain(&self, domain: &str) -> String {
        self.domains
            .get(domain)
            .and_then(|entry| entry.domain.clone())
            .unwrap_or_else(|| domain.to_string())
    }
}
