use std::convert::Infallible;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::{Json, Router};
use camsweep_common::credentials::CredentialRecord;
use camsweep_common::device::DiscoveredDevice;
use camsweep_common::event::ScanEvent;
use camsweep_core::{CredentialDirectory, ScanParams};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use super::error::ApiError;
use super::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanQuery {
    #[serde(default, deserialize_with = "port_number")]
    port: Option<i64>,
    ip_prefix: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanBody {
    #[serde(default, deserialize_with = "port_number")]
    port: Option<i64>,
    ip_prefix: Option<String>,
    camera_details: Option<Vec<CredentialRecord>>,
}

/// Accepts `554` or `"554"`; browsers send either. A blank string is no port.
fn port_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortField {
        Number(i64),
        Text(String),
    }

    match Option::<PortField>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PortField::Number(port)) => Ok(Some(port)),
        Some(PortField::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(PortField::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid port '{text}'"))),
    }
}

pub fn create_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/scan", get(scan_stream).post(scan_stream_with_details))
        .route("/scan/simple", get(scan_simple))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn scan_stream(
    State(state): State<AppState>,
    query: Result<Query<ScanQuery>, QueryRejection>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = match query {
        Ok(Query(query)) => match state.load_directory().await {
            Ok(directory) => state.scanner.stream(ScanParams {
                port: query.port,
                ip_prefix: state.prefix_or_default(query.ip_prefix),
                directory,
            }),
            Err(e) => {
                error!("{e}");
                single_event(ScanEvent::error(e.to_string()))
            }
        },
        Err(rejection) => single_event(ScanEvent::error(rejection.body_text())),
    };

    event_stream(events)
}

async fn scan_stream_with_details(
    State(state): State<AppState>,
    body: Result<Json<ScanBody>, JsonRejection>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = match body {
        Ok(Json(body)) => {
            let directory = match body.camera_details {
                Some(records) => Ok(CredentialDirectory::from_records(records)),
                None => state.load_directory().await,
            };
            match directory {
                Ok(directory) => state.scanner.stream(ScanParams {
                    port: body.port,
                    ip_prefix: state.prefix_or_default(body.ip_prefix),
                    directory,
                }),
                Err(e) => {
                    error!("{e}");
                    single_event(ScanEvent::error(e.to_string()))
                }
            }
        }
        Err(rejection) => single_event(ScanEvent::error(rejection.body_text())),
    };

    event_stream(events)
}

async fn scan_simple(
    State(state): State<AppState>,
    query: Result<Query<ScanQuery>, QueryRejection>,
) -> Result<Json<Vec<DiscoveredDevice>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let mut request = ScanParams {
        port: query.port,
        ip_prefix: state.prefix_or_default(query.ip_prefix),
        directory: CredentialDirectory::default(),
    }
    .validate()
    .inspect_err(|e| warn!("Rejected scan request: {e}"))?;
    request.directory = state.load_directory().await?;

    let devices = state.scanner.collect(request).await?;
    Ok(Json(devices))
}

fn single_event(event: ScanEvent) -> mpsc::Receiver<ScanEvent> {
    let (tx, rx) = mpsc::channel(1);
    let _ = tx.try_send(event);
    rx
}

fn event_stream(
    events: mpsc::Receiver<ScanEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = ReceiverStream::new(events).map(|event| {
        let frame = Event::default().json_data(&event).unwrap_or_else(|e| {
            let fallback = ScanEvent::error(format!("failed to encode event: {e}"));
            Event::default().data(serde_json::to_string(&fallback).unwrap_or_default())
        });
        Ok(frame)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
