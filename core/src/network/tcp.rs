//! Connect-scan port prober.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Answers whether a TCP port accepts connections.
///
/// Implementations must not fail for ordinary network errors; refused,
/// unreachable and timed out are all just `false`.
#[async_trait]
pub trait PortProber: Send + Sync {
    async fn probe(&self, ip: Ipv4Addr, port: u16) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct TcpProber {
    timeout: Duration,
}

impl TcpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl PortProber for TcpProber {
    async fn probe(&self, ip: Ipv4Addr, port: u16) -> bool {
        handshake_probe(SocketAddrV4::new(ip, port), self.timeout).await
    }
}

/// One connection attempt, no retry. The stream is dropped straight away.
pub async fn handshake_probe(addr: SocketAddrV4, probe_timeout: Duration) -> bool {
    let socket_addr = SocketAddr::V4(addr);

    match timeout(probe_timeout, TcpStream::connect(socket_addr)).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(e)) => {
            trace!("{socket_addr} refused: {e}");
            false
        }
        Err(_elapsed) => false,
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
