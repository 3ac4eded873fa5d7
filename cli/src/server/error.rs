use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use camsweep_common::error::ScanError;
use camsweep_core::directory::DirectoryError;
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Scan(_) => StatusCode::BAD_REQUEST,
            Self::Directory(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Scan request failed: {self:#}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
