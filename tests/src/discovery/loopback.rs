use std::sync::Arc;
use std::time::Duration;

use camsweep_common::event::ScanEvent;
use camsweep_core::network::{NoopResolver, TcpProber};
use camsweep_core::{CredentialDirectory, ScanOutcome, ScanRequest, Scanner};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Sweeps 127.0.0.0/24 with real sockets. Only the listener on 127.0.0.1
/// accepts, every other loopback address refuses immediately.
#[tokio::test]
async fn sweep_finds_local_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });

    let scanner = Scanner::new(
        Arc::new(TcpProber::new(Duration::from_millis(500))),
        Arc::new(NoopResolver),
    )
    .with_batch_size(32);

    let request = ScanRequest::new(i64::from(port), Some("127.0.0"), CredentialDirectory::default())
        .unwrap();
    let (tx, mut rx) = mpsc::channel(1024);
    let outcome = scanner.run(request, &tx).await;
    drop(tx);

    let ScanOutcome::Completed(devices) = outcome else {
        panic!("sweep was abandoned");
    };
    assert!(devices.iter().any(|d| d.ip.octets() == [127, 0, 0, 1]));
    assert!(devices.iter().all(|d| d.hardware_address.is_none()));

    let mut last = None;
    while let Some(event) = rx.recv().await {
        last = Some(event);
    }
    assert!(matches!(last, Some(ScanEvent::Complete { .. })));
}
