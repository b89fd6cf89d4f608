//! Change planning for one address family
//!
//! The builder compares the published address with the requested one and,
//! when they differ, adds a guarded change to the transaction:
//!
//! | Published            | Prerequisite | Action  |
//! |----------------------|--------------|---------|
//! | nothing              | absent       | add     |
//! | same address         | (none)       | (none)  |
//! | different address    | present      | replace |
//!
//! The prerequisite makes the server reject the update if another writer
//! changed the RRset between our query and our update.

use super::record::AddressRecordType;
use super::transaction::UpdateTransaction;
use crate::error::Result;
use hickory_client::rr::Name;
use std::net::IpAddr;

/// What the authoritative server currently publishes for a name and type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentAddress {
    /// A record of the type exists with this address
    Found(IpAddr),
    /// The name has no record of the type
    NotFound,
}

/// The change the builder planned for one address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedChange {
    /// Published address already matches
    Unchanged,
    /// Record will be created
    Add,
    /// Record will be replaced
    Replace {
        /// The address currently published
        previous: IpAddr,
    },
}

/// Add the change needed to publish `desired` for `owner`, if any
///
/// The record type follows the family of `desired`. A transaction may receive
/// one call per family; both changes then travel in the same message.
pub fn apply(
    transaction: &mut UpdateTransaction<'_>,
    owner: &Name,
    desired: IpAddr,
    current: &CurrentAddress,
) -> Result<PlannedChange> {
    let record_type = AddressRecordType::for_address(&desired);

    match *current {
        CurrentAddress::NotFound => {
            transaction.add_absent_prerequisite(owner, record_type)?;
            transaction.add_add_action(owner, record_type, desired)?;
            Ok(PlannedChange::Add)
        }
        CurrentAddress::Found(existing) if existing == desired => Ok(PlannedChange::Unchanged),
        CurrentAddress::Found(existing) => {
            transaction.add_present_prerequisite(owner, record_type)?;
            transaction.add_replace_action(owner, record_type, desired)?;
            Ok(PlannedChange::Replace { previous: existing })
        }
    }
}
