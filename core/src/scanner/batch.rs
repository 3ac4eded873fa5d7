use std::net::Ipv4Addr;
use std::sync::Arc;

use camsweep_common::device::{DiscoveredDevice, HostProbeResult};
use camsweep_common::network::mac::{MacAddress, UNKNOWN_MAC};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use super::ScanRequest;
use crate::directory::CredentialDirectory;
use crate::links;
use crate::network::{AddressResolver, PortProber};

/// What a host task tells the orchestrator.
#[derive(Debug)]
pub(super) enum HostUpdate {
    Probed(HostProbeResult),
    Found(DiscoveredDevice),
}

/// Everything one host task needs, owned so it can be spawned.
pub(super) struct HostSweep {
    pub prober: Arc<dyn PortProber>,
    pub resolver: Arc<dyn AddressResolver>,
    pub request: Arc<ScanRequest>,
    pub updates: UnboundedSender<HostUpdate>,
}

impl HostSweep {
    pub async fn run(self, ip: Ipv4Addr) {
        let port = self.request.port;
        let open = self.prober.probe(ip, port).await;
        let probe = HostProbeResult { ip, port, open };

        // The orchestrator only stops listening once it has given up on the scan.
        if self.updates.send(HostUpdate::Probed(probe)).is_err() || !open {
            return;
        }

        let mac = self.resolve(ip).await;
        let device = identify(probe, mac, &self.request.directory);

        info!(
            "Found device at {ip}:{port} MAC: {}",
            mac.map_or_else(|| UNKNOWN_MAC.to_string(), |m| m.to_string())
        );

        let _ = self.updates.send(HostUpdate::Found(device));
    }

    /// A failed resolution leaves the host unmatched, it never drops it.
    async fn resolve(&self, ip: Ipv4Addr) -> Option<MacAddress> {
        let resolver = Arc::clone(&self.resolver);
        match tokio::spawn(async move { resolver.resolve(ip).await }).await {
            Ok(mac) => mac,
            Err(e) => {
                warn!("MAC resolution for {ip} failed, reporting without a match: {e}");
                None
            }
        }
    }
}

/// Builds the device record, attaching credentials and links on a match.
fn identify(
    probe: HostProbeResult,
    mac: Option<MacAddress>,
    directory: &CredentialDirectory,
) -> DiscoveredDevice {
    let device = DiscoveredDevice::new(probe, mac);

    let Some(entry) = mac.and_then(|mac| directory.lookup(&mac)) else {
        return device;
    };

    let stream_links = links::synthesize(entry, probe.ip, &entry.manufacturer);
    device.with_match(entry.clone(), stream_links)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
