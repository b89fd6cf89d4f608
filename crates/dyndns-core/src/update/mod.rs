//! RFC 2136 update model
//!
//! - [`DomainTarget`]: zone/host split of the name being updated
//! - [`AddressRecordType`]: A or AAAA, chosen by address family
//! - [`SigningKey`]: TSIG key the transaction is signed with
//! - [`UpdateTransaction`]: pending prerequisites and actions for one zone
//! - [`builder::apply`]: decides what (if anything) to change
//! - [`UpdateTransmitter`]: sends dirty transactions and classifies the answer

pub mod builder;
pub mod key;
pub mod name;
pub mod record;
pub mod transaction;
pub mod transmitter;

pub use builder::{CurrentAddress, PlannedChange};
pub use key::{SigningKey, TsigAlgorithm};
pub use name::DomainTarget;
pub use record::{AddressRecordType, RECORD_TTL};
pub use transaction::{Prerequisite, UpdateAction, UpdateTransaction};
pub use transmitter::{UpdateOutcome, UpdateTransmitter};
