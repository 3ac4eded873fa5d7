//! Link-layer hardware addresses.
//!
//! Neighbor tables print MACs in whatever shape the OS likes (`AA-BB-...` on
//! Windows, `aa:bb:...` elsewhere) and operators type them by hand. Everything
//! is parsed into [`MacAddress`] first, so comparisons ignore case and
//! delimiter, and the canonical rendering is lowercase colon-delimited.

use std::fmt;
use std::str::FromStr;

use pnet::util::MacAddr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Placeholder emitted on the wire when a host's MAC could not be resolved.
pub const UNKNOWN_MAC: &str = "unknown";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid hardware address '{0}'")]
pub struct MacParseError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress(MacAddr);

impl MacAddress {
    pub fn new(octets: [u8; 6]) -> Self {
        let [a, b, c, d, e, f] = octets;
        Self(MacAddr::new(a, b, c, d, e, f))
    }

    /// Incomplete neighbor entries show up as `00:00:00:00:00:00`.
    pub fn is_zero(&self) -> bool {
        self.0 == MacAddr::zero()
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    /// Accepts exactly six two-digit hex groups separated by `:` or `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let groups: Vec<&str> = trimmed.split([':', '-']).collect();

        let well_formed = groups.len() == 6
            && groups
                .iter()
                .all(|g| g.len() == 2 && g.chars().all(|c| c.is_ascii_hexdigit()));
        if !well_formed {
            return Err(MacParseError(s.to_string()));
        }

        groups
            .join(":")
            .parse::<MacAddr>()
            .map(Self)
            .map_err(|_| MacParseError(s.to_string()))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MacAddr> for MacAddress {
    fn from(mac: MacAddr) -> Self {
        Self(mac)
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<MacAddress>` fields that use [`UNKNOWN_MAC`]
/// instead of `null`.
pub mod or_unknown {
    use super::{MacAddress, UNKNOWN_MAC};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        mac: &Option<MacAddress>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match mac {
            Some(mac) => serializer.collect_str(mac),
            None => serializer.serialize_str(UNKNOWN_MAC),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<MacAddress>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case(UNKNOWN_MAC) {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
