//! CIDR network prefixes as stored in route directories.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use thiserror::Error;

/// Separator replacing `/` in on-disk record names (`10.0.0.0_8`).
const KEY_SEPARATOR: char = '_';

/// A network prefix with its host bits cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Network {
    address: IpAddr,
    prefix_len: u8,
}

impl Network {
    /// Builds a network, clearing any host bits in `address`.
    pub fn new(address: IpAddr, prefix_len: u8) -> Result<Self, NetworkParseError> {
        let max = max_prefix_len(address);
        if prefix_len > max {
            return Err(NetworkParseError::PrefixTooLong {
                prefix_len,
                max,
            });
        }
        let masked = match address {
            IpAddr::V4(v4) => IpAddr::V4(Ipv4Addr::from(u32::from(v4) & v4_mask(prefix_len))),
            IpAddr::V6(v6) => IpAddr::V6(Ipv6Addr::from(u128::from(v6) & v6_mask(prefix_len))),
        };
        Ok(Self {
            address: masked,
            prefix_len,
        })
    }

    /// Parses an on-disk record name such as `172.20.0.0_16`.
    pub fn from_key(key: &str) -> Result<Self, NetworkParseError> {
        key.replace(KEY_SEPARATOR, "/").parse()
    }

    /// Network address.
    #[must_use]
    pub const fn address(&self) -> IpAddr {
        self.address
    }

    /// Number of fixed leading bits.
    #[must_use]
    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Returns `true` when `address` lies inside this network.
    ///
    /// Families never mix: an IPv4 address is only contained in IPv4 networks.
    #[must_use]
    pub fn contains(&self, address: IpAddr) -> bool {
        match (self.address, address) {
            (IpAddr::V4(network), IpAddr::V4(candidate)) => {
                u32::from(candidate) & v4_mask(self.prefix_len) == u32::from(network)
            }
            (IpAddr::V6(network), IpAddr::V6(candidate)) => {
                u128::from(candidate) & v6_mask(self.prefix_len) == u128::from(network)
            }
            _ => false,
        }
    }

    /// Record name used on disk, the canonical CIDR with `/` replaced.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}{KEY_SEPARATOR}{}", self.address, self.prefix_len)
    }
}

impl FromStr for Network {
    type Err = NetworkParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (address, prefix_len) = split_cidr(input)?;
        Self::new(address, prefix_len)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.address, self.prefix_len)
    }
}

/// Errors raised while parsing a CIDR prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkParseError {
    /// The text has no `/` separating address and prefix length.
    #[error("missing prefix length in '{input}'")]
    MissingPrefix {
        /// Rejected input.
        input: String,
    },
    /// The address part is not an IP literal.
    #[error("invalid network address in '{input}'")]
    InvalidAddress {
        /// Rejected input.
        input: String,
    },
    /// The prefix length is not a decimal number.
    #[error("invalid prefix length in '{input}'")]
    InvalidPrefix {
        /// Rejected input.
        input: String,
    },
    /// The prefix length exceeds the address width.
    #[error("prefix length {prefix_len} exceeds {max}")]
    PrefixTooLong {
        /// Requested prefix length.
        prefix_len: u8,
        /// Width of the address family.
        max: u8,
    },
}

/// Returns the address part of a valid CIDR string without masking it.
pub(crate) fn cidr_address(input: &str) -> Option<IpAddr> {
    let (address, prefix_len) = split_cidr(input).ok()?;
    (prefix_len <= max_prefix_len(address)).then_some(address)
}

fn split_cidr(input: &str) -> Result<(IpAddr, u8), NetworkParseError> {
    let Some((address_text, prefix)) = input.split_once('/') else {
        return Err(NetworkParseError::MissingPrefix {
            input: input.to_owned(),
        });
    };
    let address = address_text
        .parse::<IpAddr>()
        .map_err(|_| NetworkParseError::InvalidAddress {
            input: input.to_owned(),
        })?;
    if prefix.is_empty() || !prefix.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(NetworkParseError::InvalidPrefix {
            input: input.to_owned(),
        });
    }
    let prefix_len = prefix
        .parse::<u8>()
        .map_err(|_| NetworkParseError::InvalidPrefix {
            input: input.to_owned(),
        })?;
    Ok((address, prefix_len))
}

const fn max_prefix_len(address: IpAddr) -> u8 {
    match address {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

const fn v4_mask(prefix_len: u8) -> u32 {
    match u32::MAX.checked_shl(32 - prefix_len as u32) {
        Some(mask) => mask,
        None => 0,
    }
}

const fn v6_mask(prefix_len: u8) -> u128 {
    match u128::MAX.checked_shl(128 - prefix_len as u32) {
        Some(mask) => mask,
        None => 0,
    }
}
