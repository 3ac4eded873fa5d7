//! What a scan learns about each host.

use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credentials::CredentialEntry;
use crate::network::mac::{self, MacAddress};

/// Outcome of a single port probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostProbeResult {
    pub ip: Ipv4Addr,
    pub port: u16,
    pub open: bool,
}

/// Main and sub stream URLs for a matched device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamLinks {
    #[serde(rename = "hd")]
    pub primary: String,
    #[serde(rename = "sd")]
    pub secondary: String,
}

/// A host that answered on the scanned port.
///
/// Credentials and links are only present when the host's MAC matched an
/// entry in the credential directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "DeviceWire", from = "DeviceWire")]
pub struct DiscoveredDevice {
    pub ip: Ipv4Addr,
    pub port: u16,
    pub hardware_address: Option<MacAddress>,
    pub timestamp: DateTime<Utc>,
    pub credentials: Option<CredentialEntry>,
    pub stream_links: Option<StreamLinks>,
}

impl DiscoveredDevice {
    pub fn new(probe: HostProbeResult, hardware_address: Option<MacAddress>) -> Self {
        Self {
            ip: probe.ip,
            port: probe.port,
            hardware_address,
            timestamp: Utc::now(),
            credentials: None,
            stream_links: None,
        }
    }

    pub fn with_match(mut self, credentials: CredentialEntry, links: StreamLinks) -> Self {
        self.credentials = Some(credentials);
        self.stream_links = Some(links);
        self
    }

    pub fn is_matched(&self) -> bool {
        self.credentials.is_some()
    }
}

/// Browser-facing shape: login fields sit next to the address fields and the
/// MAC reads `"unknown"` when unresolved.
#[derive(Serialize, Deserialize)]
struct DeviceWire {
    ip: Ipv4Addr,
    port: u16,
    #[serde(with = "mac::or_unknown")]
    mac: Option<MacAddress>,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    company: Option<String>,
    #[serde(rename = "rtspLinks", default, skip_serializing_if = "Option::is_none")]
    rtsp_links: Option<StreamLinks>,
}

impl From<DiscoveredDevice> for DeviceWire {
    fn from(device: DiscoveredDevice) -> Self {
        let (username, password, company) = match device.credentials {
            Some(c) => (Some(c.username), Some(c.password), Some(c.manufacturer)),
            None => (None, None, None),
        };
        Self {
            ip: device.ip,
            port: device.port,
            mac: device.hardware_address,
            timestamp: device.timestamp,
            username,
            password,
            company,
            rtsp_links: device.stream_links,
        }
    }
}

impl From<DeviceWire> for DiscoveredDevice {
    fn from(wire: DeviceWire) -> Self {
        let credentials = match (wire.mac, wire.username, wire.password, wire.company) {
            (Some(mac), Some(username), Some(password), Some(company)) => {
                Some(CredentialEntry::new(mac, username, password, company))
            }
            _ => None,
        };
        Self {
            ip: wire.ip,
            port: wire.port,
            hardware_address: wire.mac,
            timestamp: wire.timestamp,
            credentials,
            stream_links: wire.rtsp_links,
        }
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
