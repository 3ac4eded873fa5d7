//! Operator-maintained device logins, keyed by hardware address.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::network::mac::MacAddress;

/// One login record from the credential directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialEntry {
    #[serde(rename = "mac")]
    pub hardware_address: MacAddress,
    pub username: String,
    pub password: String,
    /// Free-form manufacturer label, may contain spaces.
    #[serde(rename = "company")]
    pub manufacturer: String,
}

impl CredentialEntry {
    pub fn new(
        hardware_address: MacAddress,
        username: impl Into<String>,
        password: impl Into<String>,
        manufacturer: impl Into<String>,
    ) -> Self {
        Self {
            hardware_address,
            username: username.into(),
            password: password.into(),
            manufacturer: manufacturer.into(),
        }
    }
}

/// Credential as a client sends it in a `cameraDetails` payload.
///
/// The MAC is kept as text so that one bad record does not reject the whole
/// request; [`CredentialRecord::into_entry`] does the validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub mac: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub company: String,
}

impl CredentialRecord {
    pub fn into_entry(self) -> Option<CredentialEntry> {
        match self.mac.parse::<MacAddress>() {
            Ok(mac) => Some(CredentialEntry::new(
                mac,
                self.username,
                self.password,
                self.company,
            )),
            Err(e) => {
                warn!("Skipping credential record: {e}");
                None
            }
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
