//! Configuration sources
//!
//! The picker page ships two JSON resources next to itself: the service
//! configuration and the origin allow-list.

use super::ServiceConfig;
use crate::error::BridgeError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;

pub const SERVICE_CONFIG_FILE: &str = "file-picker-config.json";
pub const ALLOWED_ORIGINS_FILE: &str = "allowed-origins.json";

/// Where the bridge fetches its configuration from
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn load_service_config(&self) -> Result<ServiceConfig, BridgeError>;

    /// Origin glob patterns the host page may declare
    async fn load_allowed_origins(&self) -> Result<Vec<String>, BridgeError>;
}

// ============================================================================
// File Source
// ============================================================================

/// Reads both resources from a directory
pub struct FileConfigSource {
    dir: PathBuf,
}

impl FileConfigSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, BridgeError> {
        let path = self.dir.join(name);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| BridgeError::Config {
                reason: format!("Failed to read {}: {}", path.display(), e),
            })?;

        serde_json::from_str(&content).map_err(|e| BridgeError::Config {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })
    }
}

#[async_trait]
impl ConfigSource for FileConfigSource {
    async fn load_service_config(&self) -> Result<ServiceConfig, BridgeError> {
        self.read_json(SERVICE_CONFIG_FILE).await
    }

    async fn load_allowed_origins(&self) -> Result<Vec<String>, BridgeError> {
        self.read_json(ALLOWED_ORIGINS_FILE).await
    }
}

// ============================================================================
// HTTP Source
// ============================================================================

/// Fetches both resources relative to the page's base URL
pub struct HttpConfigSource {
    base: url::Url,
    client: reqwest::Client,
}

impl HttpConfigSource {
    pub fn new(base: &str) -> Result<Self, BridgeError> {
        let base = url::Url::parse(base).map_err(|e| BridgeError::Config {
            reason: format!("Invalid base URL '{}': {}", base, e),
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BridgeError::Config {
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { base, client })
    }

    /// URL of a resource next to the page
    pub fn resource_url(&self, name: &str) -> Result<url::Url, BridgeError> {
        self.base.join(name).map_err(|e| BridgeError::Config {
            reason: format!("Cannot resolve {} against {}: {}", name, self.base, e),
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, BridgeError> {
        let url = self.resource_url(name)?;
        tracing::debug!("[Config] Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| BridgeError::Config {
                reason: format!("Failed to fetch {}: {}", url, e),
            })?;

        response.json::<T>().await.map_err(|e| BridgeError::Config {
            reason: format!("Invalid JSON from {}: {}", url, e),
        })
    }
}

#[async_trait]
impl ConfigSource for HttpConfigSource {
    async fn load_service_config(&self) -> Result<ServiceConfig, BridgeError> {
        self.fetch_json(SERVICE_CONFIG_FILE).await
    }

    async fn load_allowed_origins(&self) -> Result<Vec<String>, BridgeError> {
        self.fetch_json(ALLOWED_ORIGINS_FILE).await
    }
}
