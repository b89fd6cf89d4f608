// # dyndns-core
//
// Core library for the RFC 2136 dynamic DNS update service.
//
// ## Architecture Overview
//
// - **DomainTarget**: zone/host split of the name a client wants to update
// - **AddressResolver**: reads what the authoritative server publishes now
// - **builder::apply**: plans a guarded add or replace inside an
//   **UpdateTransaction**, or nothing when the address already matches
// - **UpdateTransmitter**: sends a dirty transaction through an
//   **UpdateTransport** (TSIG-signed, TCP) and classifies the answer
// - **DomainUpdateCoordinator**: runs the steps above for one request
// - **UpdateService**: authorization and input checks in front of the
//   coordinator, independent of the HTTP layer
//
// ## Design Principles
//
// 1. **Traits at the I/O seams**: resolver and transport are swappable, the
//    planning logic never touches the network
// 2. **Prerequisites on every write**: an update only applies to the state
//    it was planned against
// 3. **Idempotency**: an unchanged address produces no network write
// 4. **Library-First**: the daemon is a thin front end over this crate

pub mod auth;
pub mod config;
pub mod coordinator;
pub mod dns;
pub mod error;
pub mod service;
pub mod traits;
pub mod update;

// Re-export core types for convenience
pub use auth::{ConfigAuthorizer, hash_password};
pub use config::{DomainConfig, ServiceConfig, TimeoutConfig, TsigConfig};
pub use coordinator::{DomainUpdateCoordinator, UpdateStatus};
pub use error::{Error, Operation, Result};
pub use service::{Credentials, UpdateReply, UpdateRequest, UpdateService};
pub use traits::{AddressResolver, DomainAuthorizer, UpdateTransport};
pub use update::{
    AddressRecordType, CurrentAddress, DomainTarget, SigningKey, TsigAlgorithm,
    UpdateTransaction, UpdateTransmitter,
};
