use std::sync::Arc;

use camsweep_common::config::ServerConfig;
use camsweep_core::directory::DirectoryError;
use camsweep_core::{CredentialDirectory, Scanner};

#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(scanner: Scanner, config: ServerConfig) -> Self {
        Self {
            scanner: Arc::new(scanner),
            config: Arc::new(config),
        }
    }

    /// Re-read on every request so edits apply without a restart.
    pub async fn load_directory(&self) -> Result<CredentialDirectory, DirectoryError> {
        CredentialDirectory::load(&self.config.credentials_file).await
    }

    /// The request's prefix, or the configured fallback when it is absent or blank.
    pub fn prefix_or_default(&self, ip_prefix: Option<String>) -> Option<String> {
        ip_prefix
            .filter(|p| !p.trim().is_empty())
            .or_else(|| self.config.default_prefix.clone())
    }
}
