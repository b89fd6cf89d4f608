//! Zone-scoped update transaction
//!
//! An [`UpdateTransaction`] collects the prerequisites and actions of one
//! RFC 2136 UPDATE message. It only offers the four operations this service
//! needs; each one checks that the owner lies inside the zone and that the
//! address fits the record type it targets.

use super::key::SigningKey;
use super::record::{AddressRecordType, RECORD_TTL};
use crate::error::{Error, Result};
use hickory_client::rr::Name;
use std::net::IpAddr;

/// A condition the server checks before applying any action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prerequisite {
    /// An RRset of this name and type exists (value independent)
    Present {
        owner: Name,
        record_type: AddressRecordType,
    },
    /// No RRset of this name and type exists
    Absent {
        owner: Name,
        record_type: AddressRecordType,
    },
}

impl Prerequisite {
    pub fn owner(&self) -> &Name {
        match self {
            Prerequisite::Present { owner, .. } | Prerequisite::Absent { owner, .. } => owner,
        }
    }

    pub fn record_type(&self) -> AddressRecordType {
        match self {
            Prerequisite::Present { record_type, .. }
            | Prerequisite::Absent { record_type, .. } => *record_type,
        }
    }
}

/// A change applied by the server once all prerequisites hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Add a record to a (currently absent) RRset
    Add {
        owner: Name,
        ttl: u32,
        address: IpAddr,
    },
    /// Replace the whole RRset with a single record
    Replace {
        owner: Name,
        ttl: u32,
        address: IpAddr,
    },
}

impl UpdateAction {
    pub fn owner(&self) -> &Name {
        match self {
            UpdateAction::Add { owner, .. } | UpdateAction::Replace { owner, .. } => owner,
        }
    }

    pub fn address(&self) -> IpAddr {
        match self {
            UpdateAction::Add { address, .. } | UpdateAction::Replace { address, .. } => *address,
        }
    }

    pub fn ttl(&self) -> u32 {
        match self {
            UpdateAction::Add { ttl, .. } | UpdateAction::Replace { ttl, .. } => *ttl,
        }
    }

    pub fn record_type(&self) -> AddressRecordType {
        AddressRecordType::for_address(&self.address())
    }
}

/// Pending changes to one zone, signed with a borrowed key
///
/// Created fresh for every request, filled by the builder and consumed by
/// the transmitter. A transaction is dirty once it holds at least one action.
#[derive(Debug)]
pub struct UpdateTransaction<'k> {
    zone: Name,
    key: &'k SigningKey,
    prerequisites: Vec<Prerequisite>,
    actions: Vec<UpdateAction>,
}

impl<'k> UpdateTransaction<'k> {
    /// Start an empty transaction for `zone`
    pub fn new(zone: Name, key: &'k SigningKey) -> Self {
        Self {
            zone,
            key,
            prerequisites: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Require that `owner` has an RRset of `record_type`
    pub fn add_present_prerequisite(
        &mut self,
        owner: &Name,
        record_type: AddressRecordType,
    ) -> Result<()> {
        self.ensure_in_zone(owner)?;
        self.prerequisites.push(Prerequisite::Present {
            owner: owner.clone(),
            record_type,
        });
        Ok(())
    }

    /// Require that `owner` has no RRset of `record_type`
    pub fn add_absent_prerequisite(
        &mut self,
        owner: &Name,
        record_type: AddressRecordType,
    ) -> Result<()> {
        self.ensure_in_zone(owner)?;
        self.prerequisites.push(Prerequisite::Absent {
            owner: owner.clone(),
            record_type,
        });
        Ok(())
    }

    /// Replace the `record_type` RRset of `owner` with `address`
    pub fn add_replace_action(
        &mut self,
        owner: &Name,
        record_type: AddressRecordType,
        address: IpAddr,
    ) -> Result<()> {
        self.ensure_in_zone(owner)?;
        record_type.ensure_matches(&address)?;
        self.actions.push(UpdateAction::Replace {
            owner: owner.clone(),
            ttl: RECORD_TTL,
            address,
        });
        Ok(())
    }

    /// Add `address` as a `record_type` record of `owner`
    pub fn add_add_action(
        &mut self,
        owner: &Name,
        record_type: AddressRecordType,
        address: IpAddr,
    ) -> Result<()> {
        self.ensure_in_zone(owner)?;
        record_type.ensure_matches(&address)?;
        self.actions.push(UpdateAction::Add {
            owner: owner.clone(),
            ttl: RECORD_TTL,
            address,
        });
        Ok(())
    }

    /// Whether there is anything to send
    pub fn is_dirty(&self) -> bool {
        !self.actions.is_empty()
    }

    /// The zone this transaction updates
    pub fn zone(&self) -> &Name {
        &self.zone
    }

    /// The key the transaction is signed with
    pub fn signing_key(&self) -> &'k SigningKey {
        self.key
    }

    pub fn prerequisites(&self) -> &[Prerequisite] {
        &self.prerequisites
    }

    pub fn actions(&self) -> &[UpdateAction] {
        &self.actions
    }

    fn ensure_in_zone(&self, owner: &Name) -> Result<()> {
        if self.zone.zone_of(owner) {
            Ok(())
        } else {
            Err(Error::invalid_name(format!(
                "{owner} is not inside zone {}",
                self.zone
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::key::TsigAlgorithm;
    use std::str::FromStr;

    fn key() -> SigningKey {
        SigningKey::new("update-key", TsigAlgorithm::HmacSha256, b"secret".to_vec()).unwrap()
    }

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    #[test]
    fn test_new_transaction_is_clean() {
        let key = key();
        let tx = UpdateTransaction::new(name("example.com."), &key);
        assert!(!tx.is_dirty());
        assert!(tx.prerequisites().is_empty());
        assert!(tx.actions().is_empty());
        assert_eq!(tx.zone(), &name("example.com."));
    }

    #[test]
    fn test_prerequisites_alone_do_not_make_dirty() {
        let key = key();
        let mut tx = UpdateTransaction::new(name("example.com."), &key);
        tx.add_absent_prerequisite(&name("host.example.com."), AddressRecordType::A)
            .unwrap();
        assert!(!tx.is_dirty());
    }

    #[test]
    fn test_actions_use_fixed_ttl() {
        let key = key();
        let mut tx = UpdateTransaction::new(name("example.com."), &key);
        let owner = name("host.example.com.");
        tx.add_add_action(&owner, AddressRecordType::Aaaa, "2001:db8::1".parse().unwrap())
            .unwrap();
        tx.add_replace_action(&owner, AddressRecordType::A, "198.51.100.2".parse().unwrap())
            .unwrap();

        assert!(tx.is_dirty());
        assert_eq!(tx.actions().len(), 2);
        assert!(tx.actions().iter().all(|a| a.ttl() == 300));
        assert_eq!(tx.actions()[0].record_type(), AddressRecordType::Aaaa);
        assert_eq!(tx.actions()[1].record_type(), AddressRecordType::A);
    }

    #[test]
    fn test_owner_outside_zone_is_rejected() {
        let key = key();
        let mut tx = UpdateTransaction::new(name("example.com."), &key);
        let outsider = name("host.example.org.");

        assert!(matches!(
            tx.add_present_prerequisite(&outsider, AddressRecordType::A),
            Err(Error::InvalidName(_))
        ));
        assert!(matches!(
            tx.add_add_action(&outsider, AddressRecordType::A, "192.0.2.1".parse().unwrap()),
            Err(Error::InvalidName(_))
        ));
        assert!(!tx.is_dirty());
    }

    #[test]
    fn test_action_family_must_match_record_type() {
        let key = key();
        let mut tx = UpdateTransaction::new(name("example.com."), &key);
        let owner = name("host.example.com.");

        assert!(matches!(
            tx.add_add_action(&owner, AddressRecordType::A, "2001:db8::1".parse().unwrap()),
            Err(Error::UnsupportedAddressFamily(_))
        ));
        assert!(matches!(
            tx.add_replace_action(&owner, AddressRecordType::Aaaa, "192.0.2.1".parse().unwrap()),
            Err(Error::UnsupportedAddressFamily(_))
        ));
        assert!(!tx.is_dirty());
    }
}
