pub mod scan;
pub mod serve;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use camsweep_common::config::{
    DEFAULT_BATCH_SIZE, DEFAULT_CREDENTIALS_FILE, ScanConfig, ServerConfig,
};
use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "camsweep", version)]
#[command(about = "Sweep a /24 for cameras and build their RTSP links.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log detail (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print results and warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the scan API over HTTP with server-sent progress events
    #[command(alias = "s")]
    Serve {
        #[command(flatten)]
        server: ServerArgs,
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Sweep a subnet from the terminal
    #[command(alias = "x")]
    Scan {
        /// First three octets of the /24, e.g. 192.168.1
        ip_prefix: String,
        /// TCP port to probe
        #[arg(short, long, default_value_t = 554, allow_negative_numbers = true)]
        port: i64,
        /// Credential directory (mac username password manufacturer per line)
        #[arg(short, long, default_value = DEFAULT_CREDENTIALS_FILE, env = "CAMSWEEP_CREDENTIALS")]
        credentials: PathBuf,
        #[command(flatten)]
        scan: ScanArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Per-connection timeout in milliseconds
    #[arg(long, default_value_t = 500, env = "CAMSWEEP_TIMEOUT_MS")]
    pub timeout_ms: u64,
    /// Hosts probed concurrently
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, env = "CAMSWEEP_BATCH_SIZE")]
    pub batch_size: usize,
    /// Skip MAC resolution; devices are reported without credentials
    #[arg(long)]
    pub no_arp: bool,
}

impl ScanArgs {
    pub fn to_config(&self) -> ScanConfig {
        ScanConfig {
            probe_timeout: Duration::from_millis(self.timeout_ms),
            batch_size: self.batch_size,
            resolve_mac: !self.no_arp,
            ..ScanConfig::default()
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:3000", env = "CAMSWEEP_BIND")]
    pub bind: SocketAddr,
    /// Credential directory, re-read on every scan
    #[arg(short, long, default_value = DEFAULT_CREDENTIALS_FILE, env = "CAMSWEEP_CREDENTIALS")]
    pub credentials: PathBuf,
    /// Serve static files (e.g. the browser client) from this directory
    #[arg(long, env = "CAMSWEEP_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
    /// Subnet prefix used when a request leaves `ipPrefix` out
    #[arg(long, env = "CAMSWEEP_DEFAULT_PREFIX")]
    pub default_prefix: Option<String>,
}

impl ServerArgs {
    pub fn to_config(&self) -> ServerConfig {
        ServerConfig {
            bind: self.bind,
            credentials_file: self.credentials.clone(),
            static_dir: self.static_dir.clone(),
            default_prefix: self.default_prefix.clone(),
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
