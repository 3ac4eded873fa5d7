//! Hardware address resolution through the OS neighbor table.
//!
//! There is no portable API for reading the ARP cache, so this shells out the
//! same way an operator would: ping the host once so the kernel learns its
//! link-layer address, then ask `arp` (or `ip neigh`) and scrape the first
//! MAC-shaped token out of the output.
//!
//! The table is often not populated yet when the query runs. An absent result
//! is normal and never an error.

use std::net::Ipv4Addr;
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use camsweep_common::network::mac::MacAddress;
use regex::Regex;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, ip: Ipv4Addr) -> Option<MacAddress>;
}

/// Used when MAC resolution is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

#[async_trait]
impl AddressResolver for NoopResolver {
    async fn resolve(&self, _ip: Ipv4Addr) -> Option<MacAddress> {
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NeighborTableResolver {
    echo_timeout: Duration,
    query_timeout: Duration,
}

impl NeighborTableResolver {
    pub fn new(echo_timeout: Duration, query_timeout: Duration) -> Self {
        Self {
            echo_timeout,
            query_timeout,
        }
    }

    async fn send_echo(&self, ip: Ipv4Addr) {
        let (program, args) = echo_command(ip, self.echo_timeout);
        // Only here to populate the neighbor table, the outcome is irrelevant.
        let deadline = self.echo_timeout + Duration::from_millis(500);
        if let Err(e) = run_command(program, &args, deadline).await {
            debug!("echo to {ip} failed: {e}");
        }
    }

    async fn query_table(&self, ip: Ipv4Addr) -> Option<MacAddress> {
        for (program, args) in neighbor_commands(ip) {
            match run_command(program, &args, self.query_timeout).await {
                Ok(output) => {
                    if let Some(mac) = extract_hardware_address(&output) {
                        return Some(mac);
                    }
                }
                Err(e) => debug!("{program} lookup for {ip} failed: {e}"),
            }
        }
        None
    }
}

#[async_trait]
impl AddressResolver for NeighborTableResolver {
    async fn resolve(&self, ip: Ipv4Addr) -> Option<MacAddress> {
        self.send_echo(ip).await;
        let mac = self.query_table(ip).await;
        if mac.is_none() {
            debug!("No neighbor entry for {ip}");
        }
        mac
    }
}

fn mac_pattern() -> &'static Regex {
    static MAC_PATTERN: OnceLock<Regex> = OnceLock::new();
    MAC_PATTERN.get_or_init(|| {
        Regex::new(r"([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}")
            .unwrap_or_else(|e| unreachable!("static MAC pattern: {e}"))
    })
}

/// First MAC-shaped token in `text`, skipping all-zero (incomplete) entries.
pub fn extract_hardware_address(text: &str) -> Option<MacAddress> {
    mac_pattern()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<MacAddress>().ok())
        .find(|mac| !mac.is_zero())
}

async fn run_command(program: &str, args: &[String], deadline: Duration) -> anyhow::Result<String> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = timeout(deadline, child)
        .await
        .map_err(|_| anyhow::anyhow!("{program} timed out after {deadline:?}"))??;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(target_os = "windows")]
fn echo_command(ip: Ipv4Addr, deadline: Duration) -> (&'static str, Vec<String>) {
    let millis = deadline.as_millis().max(1);
    (
        "ping",
        vec!["-n".into(), "1".into(), "-w".into(), millis.to_string(), ip.to_string()],
    )
}

#[cfg(target_os = "macos")]
fn echo_command(ip: Ipv4Addr, deadline: Duration) -> (&'static str, Vec<String>) {
    let millis = deadline.as_millis().max(1);
    (
        "ping",
        vec!["-c".into(), "1".into(), "-W".into(), millis.to_string(), ip.to_string()],
    )
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn echo_command(ip: Ipv4Addr, deadline: Duration) -> (&'static str, Vec<String>) {
    let secs = deadline.as_secs().max(1);
    (
        "ping",
        vec!["-c".into(), "1".into(), "-W".into(), secs.to_string(), ip.to_string()],
    )
}

#[cfg(target_os = "windows")]
fn neighbor_commands(ip: Ipv4Addr) -> Vec<(&'static str, Vec<String>)> {
    vec![("arp", vec!["-a".into(), ip.to_string()])]
}

#[cfg(not(target_os = "windows"))]
fn neighbor_commands(ip: Ipv4Addr) -> Vec<(&'static str, Vec<String>)> {
    vec![
        ("arp", vec!["-n".into(), ip.to_string()]),
        ("ip", vec!["neigh".into(), "show".into(), ip.to_string()]),
    ]
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
