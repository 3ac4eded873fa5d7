//! The **Scan Orchestrator**.
//!
//! Sweeps `prefix.1 ..= prefix.254` in fixed-size batches. Batches run one
//! after another; the hosts inside a batch run concurrently, each in its own
//! task, and the batch ends at an explicit join. The batch size is therefore
//! the bound on simultaneous sockets and resolver subprocesses.
//!
//! Host tasks never write events themselves. They report over a batch-scoped
//! channel and the orchestrator, as the single writer, turns those reports
//! into [`ScanEvent`]s. This keeps progress monotonic without shared
//! counters.

use std::sync::Arc;

use camsweep_common::config::{DEFAULT_BATCH_SIZE, ScanConfig};
use camsweep_common::device::DiscoveredDevice;
use camsweep_common::event::ScanEvent;
use camsweep_common::network::subnet::HOSTS_PER_SUBNET;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info, trace, warn};

use crate::network::{AddressResolver, NeighborTableResolver, NoopResolver, PortProber, TcpProber};

mod batch;
mod request;

use batch::{HostSweep, HostUpdate};
pub use request::{ScanParams, ScanRequest};

/// Buffered events between the orchestrator and its consumer.
const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Completed(Vec<DiscoveredDevice>),
    /// The event consumer went away before the sweep finished.
    Abandoned,
}

pub struct Scanner {
    prober: Arc<dyn PortProber>,
    resolver: Arc<dyn AddressResolver>,
    batch_size: usize,
}

impl Scanner {
    pub fn new(prober: Arc<dyn PortProber>, resolver: Arc<dyn AddressResolver>) -> Self {
        Self {
            prober,
            resolver,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn from_config(cfg: &ScanConfig) -> Self {
        let prober = Arc::new(TcpProber::new(cfg.probe_timeout));
        let resolver: Arc<dyn AddressResolver> = if cfg.resolve_mac {
            Arc::new(NeighborTableResolver::new(
                cfg.echo_timeout,
                cfg.neighbor_timeout,
            ))
        } else {
            Arc::new(NoopResolver)
        };

        Self::new(prober, resolver).with_batch_size(cfg.batch_size)
    }

    /// Values below 1 are raised to 1.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Validates `params` and runs the scan in the background.
    ///
    /// Invalid input yields a receiver holding a single [`ScanEvent::Error`]
    /// and nothing touches the network. Dropping the receiver cancels the
    /// scan at the next event.
    pub fn stream(self: &Arc<Self>, params: ScanParams) -> mpsc::Receiver<ScanEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        let request = match params.validate() {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected scan request: {e}");
                // Fresh channel, the buffer cannot be full.
                let _ = tx.try_send(ScanEvent::error(e.to_string()));
                return rx;
            }
        };

        let scanner = Arc::clone(self);
        tokio::spawn(async move {
            let events = tx.clone();
            let sweep = tokio::spawn(async move { scanner.run(request, &events).await });

            if let Err(e) = sweep.await {
                error!("Scan task failed: {e}");
                let _ = tx.send(ScanEvent::error(format!("internal error: {e}"))).await;
            }
        });

        rx
    }

    /// Runs the scan to completion and returns every device found.
    pub async fn collect(self: &Arc<Self>, request: ScanRequest) -> anyhow::Result<Vec<DiscoveredDevice>> {
        let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
        let scanner = Arc::clone(self);
        let sweep = tokio::spawn(async move { scanner.run(request, &tx).await });

        while rx.recv().await.is_some() {}

        match sweep.await? {
            ScanOutcome::Completed(devices) => Ok(devices),
            ScanOutcome::Abandoned => anyhow::bail!("scan was abandoned"),
        }
    }

    /// Sweeps the subnet, writing events to `events`.
    pub async fn run(&self, request: ScanRequest, events: &mpsc::Sender<ScanEvent>) -> ScanOutcome {
        let port = request.port;
        let subnet = request.subnet;
        let request = Arc::new(request);
        let hosts: Vec<_> = subnet.hosts().collect();

        info!("Starting scan on subnet {subnet} port {port}");

        let mut devices: Vec<DiscoveredDevice> = Vec::new();
        let mut scanned: usize = 0;

        for batch in hosts.chunks(self.batch_size) {
            let (tx, mut rx) = mpsc::unbounded_channel::<HostUpdate>();
            let mut tasks = JoinSet::new();

            for &ip in batch {
                let sweep = HostSweep {
                    prober: Arc::clone(&self.prober),
                    resolver: Arc::clone(&self.resolver),
                    request: Arc::clone(&request),
                    updates: tx.clone(),
                };
                tasks.spawn(sweep.run(ip));
            }
            drop(tx);

            let batch_start = scanned;
            let mut found: Vec<DiscoveredDevice> = Vec::new();

            while let Some(update) = rx.recv().await {
                let event = match update {
                    HostUpdate::Probed(probe) => {
                        trace!("{}:{} open={}", probe.ip, probe.port, probe.open);
                        scanned += 1;
                        ScanEvent::progress(scanned)
                    }
                    HostUpdate::Found(device) => {
                        found.push(device.clone());
                        ScanEvent::DeviceFound { device }
                    }
                };

                if events.send(event).await.is_err() {
                    warn!("Event consumer disconnected, abandoning scan of {subnet}");
                    tasks.abort_all();
                    return ScanOutcome::Abandoned;
                }
            }

            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    warn!("Host task failed, treating host as closed: {e}");
                }
            }

            // Hosts whose task died before reporting still count as scanned.
            let batch_end = batch_start + batch.len();
            if scanned < batch_end {
                scanned = batch_end;
                if events.send(ScanEvent::progress(scanned)).await.is_err() {
                    return ScanOutcome::Abandoned;
                }
            }

            devices.extend(found);
        }

        debug_assert_eq!(scanned, HOSTS_PER_SUBNET);
        info!("Scan complete. Found {} devices", devices.len());

        let complete = ScanEvent::Complete {
            devices: devices.clone(),
        };
        if events.send(complete).await.is_err() {
            return ScanOutcome::Abandoned;
        }

        ScanOutcome::Completed(devices)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::CredentialDirectory;
    use async_trait::async_trait;
    use camsweep_common::network::mac::MacAddress;
    use std::collections::{HashMap, HashSet};
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct ScriptedProber {
        open: HashSet<Ipv4Addr>,
        panics_on: Option<Ipv4Addr>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl PortProber for ScriptedProber {
        async fn probe(&self, ip: Ipv4Addr, _port: u16) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(1)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.panics_on == Some(ip) {
                panic!("scripted probe failure for {ip}");
            }
            self.open.contains(&ip)
        }
    }

    struct ScriptedResolver(HashMap<Ipv4Addr, MacAddress>);

    #[async_trait]
    impl AddressResolver for ScriptedResolver {
        async fn resolve(&self, ip: Ipv4Addr) -> Option<MacAddress> {
            self.0.get(&ip).copied()
        }
    }

    struct FailingResolver;

    #[async_trait]
    impl AddressResolver for FailingResolver {
        async fn resolve(&self, ip: Ipv4Addr) -> Option<MacAddress> {
            panic!("neighbor lookup for {ip} blew up");
        }
    }

    fn ip(last: u8) -> Ipv4Addr {
        Ipv4Addr::new(192, 168, 1, last)
    }

    fn request(directory: CredentialDirectory) -> ScanRequest {
        ScanRequest::new(554, Some("192.168.1"), directory).unwrap()
    }

    async fn drain(mut rx: mpsc::Receiver<ScanEvent>) -> Vec<ScanEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    fn progress_values(events: &[ScanEvent]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Progress { percent_complete } => Some(*percent_complete),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn sweeps_all_hosts_with_monotonic_progress() {
        let prober = Arc::new(ScriptedProber::default());
        let scanner = Arc::new(Scanner::new(prober.clone(), Arc::new(NoopResolver)));

        let (tx, rx) = mpsc::channel(1024);
        let outcome = scanner.run(request(CredentialDirectory::default()), &tx).await;
        drop(tx);
        let events = drain(rx).await;

        assert_eq!(outcome, ScanOutcome::Completed(vec![]));
        assert_eq!(prober.calls.load(Ordering::SeqCst), HOSTS_PER_SUBNET);

        let progress = progress_values(&events);
        assert_eq!(progress.len(), HOSTS_PER_SUBNET);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(progress.last(), Some(&100));

        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
        assert!(matches!(events.last(), Some(ScanEvent::Complete { devices }) if devices.is_empty()));
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_batch_size() {
        let prober = Arc::new(ScriptedProber::default());
        let scanner = Arc::new(Scanner::new(prober.clone(), Arc::new(NoopResolver)).with_batch_size(7));

        let (tx, rx) = mpsc::channel(1024);
        let consumer = tokio::spawn(drain(rx));
        scanner.run(request(CredentialDirectory::default()), &tx).await;
        drop(tx);
        consumer.await.unwrap();

        let max = prober.max_in_flight.load(Ordering::SeqCst);
        assert!(max >= 1 && max <= 7, "max in flight was {max}");
    }

    #[tokio::test]
    async fn matched_device_gets_credentials_and_links() {
        let mac: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        let prober = Arc::new(ScriptedProber {
            open: HashSet::from([ip(50)]),
            ..Default::default()
        });
        let resolver = Arc::new(ScriptedResolver(HashMap::from([(ip(50), mac)])));
        let scanner = Arc::new(Scanner::new(prober, resolver));
        let directory = CredentialDirectory::parse("AA:BB:CC:DD:EE:FF admin pass Tapo");

        let devices = scanner.collect(request(directory)).await.unwrap();

        assert_eq!(devices.len(), 1);
        let device = &devices[0];
        assert_eq!(device.ip, ip(50));
        assert_eq!(device.port, 554);
        assert_eq!(device.hardware_address, Some(mac));
        assert_eq!(device.credentials.as_ref().unwrap().username, "admin");
        assert!(device.stream_links.as_ref().unwrap().primary.ends_with("/stream1"));
    }

    #[tokio::test]
    async fn device_follows_a_progress_event_that_counted_it() {
        let prober = Arc::new(ScriptedProber {
            open: HashSet::from([ip(1), ip(254)]),
            ..Default::default()
        });
        let scanner = Arc::new(Scanner::new(prober, Arc::new(NoopResolver)));

        let events = drain(scanner.stream(ScanParams {
            port: Some(554),
            ip_prefix: Some("192.168.1".into()),
            directory: CredentialDirectory::default(),
        }))
        .await;

        let first_device = events
            .iter()
            .position(|e| matches!(e, ScanEvent::DeviceFound { .. }))
            .unwrap();
        assert!(events[..first_device]
            .iter()
            .any(|e| matches!(e, ScanEvent::Progress { .. })));

        for event in &events {
            if let ScanEvent::DeviceFound { device } = event {
                assert_eq!(device.port, 554);
                assert_eq!(device.hardware_address, None);
                assert!(device.credentials.is_none());
            }
        }
        assert!(matches!(events.last(), Some(ScanEvent::Complete { devices }) if devices.len() == 2));
    }

    #[tokio::test]
    async fn invalid_port_emits_single_error_without_probing() {
        let prober = Arc::new(ScriptedProber::default());
        let scanner = Arc::new(Scanner::new(prober.clone(), Arc::new(NoopResolver)));

        for port in [0, 65536] {
            let events = drain(scanner.stream(ScanParams {
                port: Some(port),
                ip_prefix: Some("192.168.1".into()),
                directory: CredentialDirectory::default(),
            }))
            .await;

            assert_eq!(events.len(), 1);
            assert!(matches!(&events[0], ScanEvent::Error { message } if message.contains("invalid port")));
        }
        assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failing_host_does_not_abort_the_scan() {
        let prober = Arc::new(ScriptedProber {
            open: HashSet::from([ip(20)]),
            panics_on: Some(ip(15)),
            ..Default::default()
        });
        let scanner = Arc::new(Scanner::new(prober, Arc::new(NoopResolver)));

        let (tx, rx) = mpsc::channel(1024);
        let outcome = scanner.run(request(CredentialDirectory::default()), &tx).await;
        drop(tx);
        let events = drain(rx).await;

        assert!(matches!(outcome, ScanOutcome::Completed(ref d) if d.len() == 1));
        let progress = progress_values(&events);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(progress.last(), Some(&100));
    }

    #[tokio::test]
    async fn dropped_consumer_abandons_remaining_batches() {
        let prober = Arc::new(ScriptedProber::default());
        let scanner = Arc::new(Scanner::new(prober.clone(), Arc::new(NoopResolver)));

        let (tx, mut rx) = mpsc::channel(1);
        let sweep = {
            let scanner = Arc::clone(&scanner);
            tokio::spawn(async move { scanner.run(request(CredentialDirectory::default()), &tx).await })
        };

        assert!(rx.recv().await.is_some());
        drop(rx);

        assert_eq!(sweep.await.unwrap(), ScanOutcome::Abandoned);
        assert!(prober.calls.load(Ordering::SeqCst) < HOSTS_PER_SUBNET);
    }

    #[tokio::test]
    async fn failed_resolution_still_reports_open_host() {
        let prober = Arc::new(ScriptedProber {
            open: HashSet::from([ip(50)]),
            ..ScriptedProber::default()
        });
        let scanner = Arc::new(Scanner::new(prober, Arc::new(FailingResolver)));
        let directory = CredentialDirectory::parse("aa:bb:cc:dd:ee:ff admin pass Tapo");

        let devices = scanner.collect(request(directory)).await.unwrap();

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].ip, ip(50));
        assert!(devices[0].hardware_address.is_none());
        assert!(!devices[0].is_matched());
        assert!(devices[0].stream_links.is_none());
    }

    #[test]
    fn batch_size_has_a_floor_of_one() {
        let scanner = Scanner::new(Arc::new(ScriptedProber::default()), Arc::new(NoopResolver))
            .with_batch_size(0);
        assert_eq!(scanner.batch_size(), 1);
    }
}
