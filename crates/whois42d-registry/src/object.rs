//! Classification of raw query tokens into candidate representations.

use std::ffi::OsStr;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;

use crate::network::cidr_address;

/// Canonical candidates derived from one query token.
///
/// Name rules test [`upper`](Self::upper) or [`lower`](Self::lower); route
/// rules use [`ipv4`](Self::ipv4) or [`ipv6`](Self::ipv6). At most one of the
/// two address candidates is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedQuery {
    upper: String,
    lower: String,
    address: Option<IpAddr>,
}

impl ClassifiedQuery {
    /// Upper-cased object name.
    #[must_use]
    pub fn upper(&self) -> &str {
        &self.upper
    }

    /// Lower-cased object name.
    #[must_use]
    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// IPv4 candidate, including IPv4-mapped IPv6 input.
    #[must_use]
    pub const fn ipv4(&self) -> Option<Ipv4Addr> {
        match self.address {
            Some(IpAddr::V4(address)) => Some(address),
            _ => None,
        }
    }

    /// IPv6 candidate for addresses that are not IPv4-mapped.
    #[must_use]
    pub const fn ipv6(&self) -> Option<Ipv6Addr> {
        match self.address {
            Some(IpAddr::V6(address)) => Some(address),
            _ => None,
        }
    }

    /// Returns `true` when the token looked like an address or prefix.
    #[must_use]
    pub const fn is_address(&self) -> bool {
        self.address.is_some()
    }
}

/// Classifies a query token.
///
/// Only the final path component is kept, so `../../etc/passwd` becomes
/// `passwd` before it is ever joined onto the data directory. The component
/// is parsed as an address literal; failing that, the whole token is parsed
/// as a CIDR prefix and its address part is used. Classification never fails:
/// a token that is neither a name nor an address simply matches nothing.
///
/// ```
/// use std::net::Ipv4Addr;
/// use whois42d_registry::classify;
///
/// let query = classify("172.20.0.53");
/// assert_eq!(query.ipv4(), Some(Ipv4Addr::new(172, 20, 0, 53)));
/// assert_eq!(classify("foo-mnt").upper(), "FOO-MNT");
/// ```
#[must_use]
pub fn classify(token: &str) -> ClassifiedQuery {
    let trimmed = token.trim();
    let name = Path::new(trimmed)
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or_default();

    let address = name
        .parse::<IpAddr>()
        .ok()
        .or_else(|| cidr_address(trimmed))
        .map(normalise_address);

    ClassifiedQuery {
        upper: name.to_uppercase(),
        lower: name.to_lowercase(),
        address,
    }
}

fn normalise_address(address: IpAddr) -> IpAddr {
    match address {
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map_or(IpAddr::V6(v6), IpAddr::V4),
        IpAddr::V4(_) => address,
    }
}
