//! Scripted network doubles so whole sweeps run without touching a LAN.

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use camsweep_common::event::ScanEvent;
use camsweep_common::network::mac::MacAddress;
use camsweep_core::network::{AddressResolver, PortProber};
use camsweep_core::{ScanParams, Scanner};

#[derive(Default)]
pub struct FakeLan {
    open: HashSet<Ipv4Addr>,
    macs: HashMap<Ipv4Addr, MacAddress>,
    probes: AtomicUsize,
}

impl FakeLan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn camera(mut self, ip: Ipv4Addr, mac: &str) -> Self {
        self.open.insert(ip);
        self.macs.insert(ip, mac.parse().expect("valid test MAC"));
        self
    }

    pub fn silent_host(mut self, ip: Ipv4Addr) -> Self {
        self.open.insert(ip);
        self
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortProber for FakeLan {
    async fn probe(&self, ip: Ipv4Addr, _port: u16) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.open.contains(&ip)
    }
}

#[async_trait]
impl AddressResolver for FakeLan {
    async fn resolve(&self, ip: Ipv4Addr) -> Option<MacAddress> {
        self.macs.get(&ip).copied()
    }
}

pub fn scanner(lan: &Arc<FakeLan>) -> Arc<Scanner> {
    Arc::new(Scanner::new(lan.clone(), lan.clone()))
}

/// Streams a scan and gathers every event until the channel closes.
pub async fn drain(scanner: &Arc<Scanner>, params: ScanParams) -> Vec<ScanEvent> {
    let mut rx = scanner.stream(params);
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}
