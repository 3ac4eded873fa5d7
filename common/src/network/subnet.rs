//! The /24 ranges a scan sweeps.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

/// Usable hosts in a /24 once network and broadcast are stripped.
pub const HOSTS_PER_SUBNET: usize = 254;

const SUBNET_PREFIX_LEN: u8 = 24;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubnetParseError {
    #[error("subnet prefix is empty")]
    Empty,
    #[error("subnet prefix '{0}' must have exactly three octets, e.g. 192.168.1")]
    OctetCount(String),
    #[error("invalid octet '{octet}' in subnet prefix '{prefix}'")]
    Octet { prefix: String, octet: String },
}

/// First three octets of an IPv4 /24, e.g. `192.168.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubnetPrefix {
    octets: [u8; 3],
}

impl SubnetPrefix {
    pub fn new(a: u8, b: u8, c: u8) -> Self {
        Self { octets: [a, b, c] }
    }

    pub fn network(&self) -> Ipv4Network {
        let [a, b, c] = self.octets;
        // A /24 is always a valid prefix length.
        Ipv4Network::new(Ipv4Addr::new(a, b, c, 0), SUBNET_PREFIX_LEN)
            .unwrap_or_else(|_| unreachable!("/24 is a valid IPv4 prefix"))
    }

    /// Host addresses `.1 ..= .254` in ascending order.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let net = self.network();
        let start: u32 = u32::from(net.network()).saturating_add(1);
        let end: u32 = u32::from(net.broadcast()).saturating_sub(1);
        (start..=end).map(Ipv4Addr::from)
    }
}

impl FromStr for SubnetPrefix {
    type Err = SubnetParseError;

    /// Parses `"a.b.c"`. Surrounding whitespace and a single trailing dot are
    /// tolerated since operators often paste `192.168.1.`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(SubnetParseError::Empty);
        }

        let parts: Vec<&str> = trimmed.split('.').collect();
        let [a, b, c] = parts.as_slice() else {
            return Err(SubnetParseError::OctetCount(s.to_string()));
        };

        let parse_octet = |octet: &str| {
            octet.parse::<u8>().map_err(|_| SubnetParseError::Octet {
                prefix: s.to_string(),
                octet: octet.to_string(),
            })
        };

        Ok(Self::new(parse_octet(a)?, parse_octet(b)?, parse_octet(c)?))
    }
}

impl fmt::Display for SubnetPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.octets;
        write!(f, "{a}.{b}.{c}")
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
