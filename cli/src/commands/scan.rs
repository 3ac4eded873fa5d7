use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use camsweep_common::config::ScanConfig;
use camsweep_common::device::DiscoveredDevice;
use camsweep_common::event::ScanEvent;
use camsweep_core::{CredentialDirectory, ScanOutcome, ScanRequest, Scanner};
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::terminal::{format, print, progress};

pub async fn scan(
    ip_prefix: &str,
    port: i64,
    credentials: &Path,
    cfg: &ScanConfig,
) -> anyhow::Result<()> {
    let directory = CredentialDirectory::load(credentials)
        .await
        .with_context(|| format!("loading credentials from {}", credentials.display()))?;
    let request = ScanRequest::new(port, Some(ip_prefix), directory)?;

    print::aligned_line("Subnet", format!("{}.0/24", request.subnet), 11);
    print::aligned_line("Port", request.port, 11);
    print::aligned_line("Credentials", request.directory.len(), 11);
    print::header("sweeping");

    let span = progress::scan_span(request.subnet, request.port);
    let scanner = Arc::new(Scanner::from_config(cfg));
    let start_time = Instant::now();

    let (tx, mut rx) = mpsc::channel::<ScanEvent>(64);
    let sweep = tokio::spawn(async move { scanner.run(request, &tx).await });

    let watch = {
        let span = span.clone();
        async move {
            while let Some(event) = rx.recv().await {
                match event {
                    ScanEvent::Progress { percent_complete } => progress::report(&span, percent_complete),
                    ScanEvent::DeviceFound { device } => print::print_status(format::found_line(&device)),
                    ScanEvent::Error { message } => anyhow::bail!(message),
                    ScanEvent::Complete { .. } => {}
                }
            }
            Ok(())
        }
    };
    watch.instrument(span).await?;

    let devices = match sweep.await? {
        ScanOutcome::Completed(devices) => devices,
        ScanOutcome::Abandoned => anyhow::bail!("scan stopped before it finished"),
    };

    scan_ends(&devices, start_time);
    Ok(())
}

fn scan_ends(devices: &[DiscoveredDevice], start_time: Instant) {
    print::header("results");

    if devices.is_empty() {
        print::no_results();
    }

    for (idx, device) in devices.iter().enumerate() {
        let name = device
            .credentials
            .as_ref()
            .map_or_else(|| String::from("unmatched device"), |c| c.manufacturer.clone());
        print::tree_head(idx, &name);
        print::as_tree_one_level(&format::device_to_key_value_pairs(device));
    }

    let matched = devices.iter().filter(|d| d.is_matched()).count();
    print::summary(devices.len(), matched, start_time.elapsed());
}
