// # Address Resolver Trait
//
// Defines the interface for reading the address a DNS server currently
// publishes for a name.
//
// ## Implementations
//
// - hickory-based single-server client: `crate::dns::ServerResolver`
// - In-memory doubles in the contract tests
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::AddressResolver;
// use dyndns_core::update::{AddressRecordType, CurrentAddress};
//
// let current = resolver
//     .resolve(target.fqdn(), AddressRecordType::A, "192.0.2.53:53".parse()?)
//     .await?;
//
// match current {
//     CurrentAddress::Found(ip) => println!("published: {ip}"),
//     CurrentAddress::NotFound => println!("no A record yet"),
// }
// ```

use crate::update::{AddressRecordType, CurrentAddress};
use async_trait::async_trait;
use hickory_client::rr::Name;
use std::net::SocketAddr;

/// Trait for reading published address records
///
/// # Contract
///
/// - Query exactly `server`. Never fall back to the system resolver: the
///   point is to detect drift against that server's own data.
/// - NXDOMAIN and "no record of this type" are `Ok(CurrentAddress::NotFound)`.
/// - Every other failure (timeout, SERVFAIL, REFUSED, malformed reply) is an
///   `Err`. Reporting such a failure as `NotFound` would make the builder
///   guard an add with an "absent" prerequisite against a name that may
///   exist.
/// - No retries; a failed query fails the request.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Look up the address `server` publishes for `name` and `record_type`
    ///
    /// # Returns
    ///
    /// - `Ok(CurrentAddress::Found(ip))`: first record of the type
    /// - `Ok(CurrentAddress::NotFound)`: no such record
    /// - `Err(Error)`: the query failed
    async fn resolve(
        &self,
        name: &Name,
        record_type: AddressRecordType,
        server: SocketAddr,
    ) -> Result<CurrentAddress, crate::Error>;
}
