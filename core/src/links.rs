//! RTSP link synthesis for matched devices.

use std::net::Ipv4Addr;

use camsweep_common::credentials::CredentialEntry;
use camsweep_common::device::StreamLinks;

const SCHEME: &str = "rtsp";
const RTSP_PORT: u16 = 554;

/// URL layout family a manufacturer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamProfile {
    /// `/stream1` main, `/stream2` sub.
    TapoStyle,
    /// Dahua-style `/cam/realmonitor`, used for everything not listed.
    GenericStyle,
}

/// Lower-cased manufacturer tags with their own layout.
const PROFILES: &[(&str, StreamProfile)] = &[("tapo", StreamProfile::TapoStyle)];

impl StreamProfile {
    pub fn from_manufacturer(manufacturer: &str) -> Self {
        let tag = manufacturer.trim().to_ascii_lowercase();
        PROFILES
            .iter()
            .find(|(name, _)| *name == tag)
            .map_or(Self::GenericStyle, |(_, profile)| *profile)
    }

    fn paths(self) -> (&'static str, &'static str) {
        match self {
            Self::TapoStyle => ("/stream1", "/stream2"),
            Self::GenericStyle => (
                "/cam/realmonitor?channel=1&subtype=0",
                "/cam/realmonitor?channel=1&subtype=1",
            ),
        }
    }
}

/// Builds the main and sub stream URLs for a device.
///
/// Credentials are embedded as-is.
pub fn synthesize(credentials: &CredentialEntry, ip: Ipv4Addr, manufacturer: &str) -> StreamLinks {
    let (primary, secondary) = StreamProfile::from_manufacturer(manufacturer).paths();
    let base = format!(
        "{SCHEME}://{}:{}@{ip}:{RTSP_PORT}",
        credentials.username, credentials.password
    );

    StreamLinks {
        primary: format!("{base}{primary}"),
        secondary: format!("{base}{secondary}"),
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
