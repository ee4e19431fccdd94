//! Address filter: decides which input tokens are worth geolocating.
//!
//! Only public unicast IPv4 addresses pass. Malformed tokens, RFC 1918
//! space and the IANA special-purpose blocks are rejected.

use std::fmt;
use std::net::Ipv4Addr;

/// Why a token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Malformed,
    Private,
    Reserved,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "not a valid IPv4 address"),
            Self::Private => write!(f, "private address"),
            Self::Reserved => write!(f, "reserved address"),
        }
    }
}

/// Special-purpose blocks that are not private but never geolocate.
/// (network, prefix length)
const RESERVED_BLOCKS: &[([u8; 4], u8)] = &[
    ([0, 0, 0, 0], 8),        // "this network"
    ([100, 64, 0, 0], 10),    // shared address space (CGNAT)
    ([127, 0, 0, 0], 8),      // loopback
    ([169, 254, 0, 0], 16),   // link-local
    ([192, 0, 0, 0], 24),     // IETF protocol assignments
    ([192, 0, 2, 0], 24),     // TEST-NET-1
    ([198, 18, 0, 0], 15),    // benchmarking
    ([198, 51, 100, 0], 24),  // TEST-NET-2
    ([203, 0, 113, 0], 24),   // TEST-NET-3
    ([224, 0, 0, 0], 4),      // multicast
    ([240, 0, 0, 0], 4),      // future use, includes broadcast
];

/// Parse `token` and check that it is a public IPv4 address.
///
/// Surrounding whitespace is ignored. The empty string is `Malformed`.
pub fn classify(token: &str) -> Result<Ipv4Addr, Rejection> {
    let addr: Ipv4Addr = token.trim().parse().map_err(|_| Rejection::Malformed)?;

    if addr.is_private() {
        return Err(Rejection::Private);
    }
    if is_reserved(addr) {
        return Err(Rejection::Reserved);
    }
    Ok(addr)
}

/// `true` if `token` is a usable public IPv4 address.
pub fn is_usable(token: &str) -> bool {
    classify(token).is_ok()
}

fn is_reserved(addr: Ipv4Addr) -> bool {
    let bits = u32::from(addr);
    RESERVED_BLOCKS.iter().any(|&(net, len)| {
        let mask = u32::MAX << (32 - u32::from(len));
        bits & mask == u32::from(Ipv4Addr::from(net)) & mask
    })
}
