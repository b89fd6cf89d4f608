//! Validation of client-supplied addresses

use crate::update::AddressRecordType;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Parse `text` as an IPv4 address, optionally requiring it to be public
pub fn parse_ipv4(text: &str, require_public: bool) -> Option<Ipv4Addr> {
    match AddressRecordType::parse_address(text).ok()? {
        (AddressRecordType::A, IpAddr::V4(ip)) if !require_public || is_public_v4(&ip) => Some(ip),
        _ => None,
    }
}

/// Parse `text` as an IPv6 address, optionally requiring it to be public
pub fn parse_ipv6(text: &str, require_public: bool) -> Option<Ipv6Addr> {
    match AddressRecordType::parse_address(text).ok()? {
        (AddressRecordType::Aaaa, IpAddr::V6(ip)) if !require_public || is_public_v6(&ip) => {
            Some(ip)
        }
        _ => None,
    }
}

/// Whether `ip` is globally routable unicast
///
/// Excludes the IANA special-purpose ranges (RFC 6890 and successors) as
/// well as multicast.
pub fn is_public_v4(ip: &Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();

    !(ip.is_unspecified()
        || ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_documentation()
        || ip.is_multicast()
        || a == 0
        // shared address space (100.64.0.0/10)
        || (a == 100 && (b & 0xc0) == 64)
        // IETF protocol assignments (192.0.0.0/24)
        || (a == 192 && b == 0 && c == 0)
        // benchmarking (198.18.0.0/15)
        || (a == 198 && (b & 0xfe) == 18)
        // reserved (240.0.0.0/4)
        || a >= 240)
}

/// Whether `ip` is globally routable unicast
pub fn is_public_v6(ip: &Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_public_v4(&mapped);
    }

    let segments = ip.segments();

    !(ip.is_unspecified()
        || ip.is_loopback()
        || ip.is_multicast()
        // unique local (fc00::/7)
        || (segments[0] & 0xfe00) == 0xfc00
        // link-local (fe80::/10)
        || (segments[0] & 0xffc0) == 0xfe80
        // documentation (2001:db8::/32)
        || (segments[0] == 0x2001 && segments[1] == 0x0db8)
        // discard-only (100::/64)
        || (segments[0] == 0x0100 && segments[1..4] == [0, 0, 0])
        // IETF protocol assignments (2001::/23)
        || (segments[0] == 0x2001 && segments[1] < 0x0200))
}
