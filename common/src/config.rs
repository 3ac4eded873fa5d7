use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_ECHO_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_NEIGHBOR_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_HTTP_PORT: u16 = 3000;
pub const DEFAULT_CREDENTIALS_FILE: &str = "cameras.txt";

/// Scan engine tunables.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Deadline for a single TCP connection attempt.
    pub probe_timeout: Duration,
    /// Hosts probed concurrently before the scanner waits for the batch.
    pub batch_size: usize,
    /// Disables the neighbor table lookup for responsive hosts.
    ///
    /// Devices are still reported, with an unknown MAC and no credentials.
    pub resolve_mac: bool,
    pub echo_timeout: Duration,
    pub neighbor_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            batch_size: DEFAULT_BATCH_SIZE,
            resolve_mac: true,
            echo_timeout: DEFAULT_ECHO_TIMEOUT,
            neighbor_timeout: DEFAULT_NEIGHBOR_TIMEOUT,
        }
    }
}

/// HTTP front end settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Re-read on every request so edits show up without a restart.
    pub credentials_file: PathBuf,
    pub static_dir: Option<PathBuf>,
    /// Used when a request omits `ipPrefix`.
    pub default_prefix: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DEFAULT_HTTP_PORT)),
            credentials_file: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            static_dir: None,
            default_prefix: None,
        }
    }
}
