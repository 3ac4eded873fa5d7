use anyhow::Context;
use camsweep_common::config::{ScanConfig, ServerConfig};
use camsweep_core::Scanner;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::server::{self, AppState};

pub async fn serve(server_cfg: ServerConfig, scan_cfg: &ScanConfig) -> anyhow::Result<()> {
    let bind = server_cfg.bind;
    let state = AppState::new(Scanner::from_config(scan_cfg), server_cfg);
    let app = server::create_router(state);

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding {bind}"))?;

    info!("Scanner app running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
