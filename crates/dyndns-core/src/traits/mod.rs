//! Core traits for the dynamic DNS update service
//!
//! This module defines the seams between the update engine and the outside
//! world.
//!
//! - [`AddressResolver`]: Read the currently published address
//! - [`UpdateTransport`]: Exchange a signed UPDATE message with the server
//! - [`DomainAuthorizer`]: Accept domains and check client credentials

pub mod address_resolver;
pub mod authorizer;
pub mod update_transport;

pub use address_resolver::AddressResolver;
pub use authorizer::DomainAuthorizer;
pub use update_transport::UpdateTransport;
