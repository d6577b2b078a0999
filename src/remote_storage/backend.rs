// src/remote_storage/backend.rs
//!
//! Storage Service Trait and OCS/WebDAV Implementation
//!

use super::error::StorageError;
use super::types::ShareRequest;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// WebDAV root used for authenticated downloads and the token probe
pub const WEBDAV_PATH: &str = "/remote.php/webdav";

/// Sharing API endpoint
pub const SHARES_PATH: &str = "/ocs/v1.php/apps/files_sharing/api/v1/shares";

/// Storage service operations used by the bridge
///
/// `server` is the service base URL from the picker configuration.
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Lightweight authenticated request that only succeeds for a usable token
    async fn probe(&self, server: &str, access_token: &str) -> Result<(), StorageError>;

    /// Create a share and return the raw XML response body
    async fn create_share(
        &self,
        server: &str,
        access_token: Option<&str>,
        request: &ShareRequest,
    ) -> Result<String, StorageError>;
}

/// HTTP implementation against an ownCloud/OCIS style server
pub struct OcsStorageService {
    client: reqwest::Client,
}

impl OcsStorageService {
    pub fn new() -> Result<Self, StorageError> {
        Self::with_timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::ConnectionFailed {
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl StorageService for OcsStorageService {
    async fn probe(&self, server: &str, access_token: &str) -> Result<(), StorageError> {
        let mut url = url::Url::parse(&format!("{}{}/", server, WEBDAV_PATH)).map_err(|e| {
            StorageError::RequestFailed {
                reason: format!("Invalid server URL '{}': {}", server, e),
            }
        })?;
        url.query_pairs_mut().append_pair("access_token", access_token);

        let response = self
            .client
            .head(url)
            .header(AUTHORIZATION, format!("Bearer {}", access_token))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(StorageError::Unauthorized {
                status: status.as_u16(),
            })
        }
    }

    async fn create_share(
        &self,
        server: &str,
        access_token: Option<&str>,
        request: &ShareRequest,
    ) -> Result<String, StorageError> {
        let url = format!("{}{}", server, SHARES_PATH);

        let mut builder = self.client.post(&url).form(&request.form_fields());
        if let Some(token) = access_token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            "[Storage] Share creation for {} answered HTTP {}",
            request.path,
            status.as_u16()
        );

        Ok(body)
    }
}
