//! Address record types

use crate::error::{Error, Result};
use hickory_client::rr::RecordType;
use std::fmt;
use std::net::IpAddr;

/// Fixed TTL of every record written by this service (in seconds)
pub const RECORD_TTL: u32 = 300;

/// The record types this service manages
///
/// The type is always derived from the address family: IPv4 → A,
/// IPv6 → AAAA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressRecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    Aaaa,
}

impl AddressRecordType {
    /// Record type for an address
    pub fn for_address(address: &IpAddr) -> Self {
        match address {
            IpAddr::V4(_) => AddressRecordType::A,
            IpAddr::V6(_) => AddressRecordType::Aaaa,
        }
    }

    /// Parse textual address input and select its record type
    ///
    /// Text that is neither an IPv4 nor an IPv6 address is rejected with
    /// [`Error::UnsupportedAddressFamily`].
    pub fn parse_address(input: &str) -> Result<(Self, IpAddr)> {
        let address: IpAddr = input
            .trim()
            .parse()
            .map_err(|_| Error::unsupported_family(format!("{input:?} is not an IP address")))?;
        Ok((Self::for_address(&address), address))
    }

    /// Whether `address` belongs to this record type's family
    pub fn matches(&self, address: &IpAddr) -> bool {
        Self::for_address(address) == *self
    }

    /// Fail unless `address` belongs to this record type's family
    pub fn ensure_matches(&self, address: &IpAddr) -> Result<()> {
        if self.matches(address) {
            Ok(())
        } else {
            Err(Error::unsupported_family(format!(
                "{address} cannot be stored in a {self} record"
            )))
        }
    }

    /// The wire record type
    pub fn record_type(&self) -> RecordType {
        match self {
            AddressRecordType::A => RecordType::A,
            AddressRecordType::Aaaa => RecordType::AAAA,
        }
    }

    /// Mnemonic of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressRecordType::A => "A",
            AddressRecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for AddressRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
