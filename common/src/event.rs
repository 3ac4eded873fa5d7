//! Incremental scan reporting.
//!
//! A scan emits any number of [`ScanEvent::Progress`] and
//! [`ScanEvent::DeviceFound`] events, interleaved, and exactly one terminal
//! event ([`ScanEvent::Complete`] or [`ScanEvent::Error`]) last.

use serde::{Deserialize, Serialize};

use crate::device::DiscoveredDevice;
use crate::network::subnet::HOSTS_PER_SUBNET;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScanEvent {
    Progress {
        #[serde(rename = "progress")]
        percent_complete: u8,
    },
    #[serde(rename = "device")]
    DeviceFound { device: DiscoveredDevice },
    Complete {
        #[serde(rename = "cameras")]
        devices: Vec<DiscoveredDevice>,
    },
    Error { message: String },
}

impl ScanEvent {
    pub fn progress(scanned: usize) -> Self {
        Self::Progress {
            percent_complete: percent_complete(scanned),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}

/// `floor(scanned / 254 * 100)`, clamped to 100.
pub fn percent_complete(scanned: usize) -> u8 {
    let pct = scanned.min(HOSTS_PER_SUBNET) * 100 / HOSTS_PER_SUBNET;
    u8::try_from(pct).unwrap_or(100)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
