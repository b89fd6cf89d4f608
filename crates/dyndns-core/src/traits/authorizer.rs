// # Domain Authorizer Trait
//
// Defines the credential and domain checks made before any DNS traffic.
//
// ## Implementations
//
// - Configuration-backed with argon2 hashes: `crate::auth::ConfigAuthorizer`

/// Trait for deciding which domains may be updated and by whom
///
/// The request handler calls this before constructing any transaction. A
/// domain that is not accepted, or a client that is not authorized, is a
/// request-level rejection and never reaches the DNS server.
pub trait DomainAuthorizer: Send + Sync {
    /// Whether `domain` is managed by this service
    fn is_accepted_domain(&self, domain: &str) -> bool;

    /// Whether `username`/`password` may update `domain`
    ///
    /// # Returns
    ///
    /// - `Ok(true)` / `Ok(false)`: credentials checked
    /// - `Err(Error)`: the credential store itself is unusable (for example
    ///   an unparsable password hash)
    fn is_client_authorized(
        &self,
        domain: &str,
        username: &str,
        password: &str,
    ) -> Result<bool, crate::Error>;

    /// The zone name to update for a public-facing `domain`
    ///
    /// Lets a public alias map to an internal name. Defaults to `domain`
    /// itself.
    fn real_domain(&self, domain: &str) -> String;
}
