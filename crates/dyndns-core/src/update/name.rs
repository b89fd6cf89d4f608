//! Zone/host split of the name being updated

use crate::error::{Error, Result};
use hickory_client::rr::Name;
use std::fmt;

/// A fully qualified domain name split into its zone and host label
///
/// The zone is the parent of the name (the name minus its leftmost label)
/// and is the zone the update transaction is scoped to. The host label is
/// the name relative to that zone.
///
/// A name without a non-root parent (the root itself, or a single label such
/// as `com`) cannot be updated and is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainTarget {
    fqdn: Name,
    zone: Name,
    host_label: String,
}

impl DomainTarget {
    /// Parse and split a domain name
    ///
    /// A missing trailing dot is accepted; the name is always treated as
    /// absolute.
    pub fn parse(domain: &str) -> Result<Self> {
        let mut fqdn = Name::from_ascii(domain.trim())
            .map_err(|e| Error::invalid_name(format!("{domain:?}: {e}")))?;
        fqdn.set_fqdn(true);

        if fqdn.num_labels() < 2 {
            return Err(Error::invalid_name(format!(
                "{domain:?} has no parent zone"
            )));
        }

        let host_label = fqdn
            .iter()
            .next()
            .map(|label| String::from_utf8_lossy(label).into_owned())
            .ok_or_else(|| Error::invalid_name(format!("{domain:?} has no host label")))?;
        let zone = fqdn.base_name();

        Ok(Self {
            fqdn,
            zone,
            host_label,
        })
    }

    /// The absolute name, used as record owner on the wire
    pub fn fqdn(&self) -> &Name {
        &self.fqdn
    }

    /// The parent zone
    pub fn zone(&self) -> &Name {
        &self.zone
    }

    /// The leftmost label, relative to the zone
    pub fn host_label(&self) -> &str {
        &self.host_label
    }
}

impl fmt::Display for DomainTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (zone {})", self.host_label, self.zone)
    }
}
