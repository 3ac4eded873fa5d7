use camsweep_common::error::ScanError;
use camsweep_common::network::subnet::SubnetPrefix;

use crate::directory::CredentialDirectory;

/// Unvalidated scan input as it arrives from a front end.
#[derive(Debug, Clone, Default)]
pub struct ScanParams {
    pub port: Option<i64>,
    pub ip_prefix: Option<String>,
    pub directory: CredentialDirectory,
}

impl ScanParams {
    pub fn validate(self) -> Result<ScanRequest, ScanError> {
        let port = self.port.ok_or(ScanError::MissingPort)?;
        ScanRequest::new(port, self.ip_prefix.as_deref(), self.directory)
    }
}

/// A validated scan. Immutable for the life of the scan.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub port: u16,
    pub subnet: SubnetPrefix,
    pub directory: CredentialDirectory,
}

impl ScanRequest {
    pub fn new(
        port: i64,
        ip_prefix: Option<&str>,
        directory: CredentialDirectory,
    ) -> Result<Self, ScanError> {
        let port = u16::try_from(port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or(ScanError::InvalidPort(port))?;

        let ip_prefix = ip_prefix
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(ScanError::MissingSubnet)?;

        Ok(Self {
            port,
            subnet: ip_prefix.parse()?,
            directory,
        })
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
