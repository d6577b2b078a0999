//! Bridge configuration
//!
//! Launch parameters come from the page's query string and are fixed at
//! startup. The service configuration is fetched once, lazily, the first time
//! a component needs it.

mod params;
mod source;

pub use params::{LaunchParams, Variation};
pub use source::{
    ConfigSource, FileConfigSource, HttpConfigSource, ALLOWED_ORIGINS_FILE, SERVICE_CONFIG_FILE,
};

use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// OpenID Connect identity of the picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenIdConnectConfig {
    pub authority: String,
    pub client_id: String,
}

/// Contents of `file-picker-config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Base URL of the storage service
    pub server: String,
    pub open_id_connect: OpenIdConnectConfig,
}

/// Immutable configuration shared by every bridge component
pub struct Settings {
    pub params: LaunchParams,
    source: Arc<dyn ConfigSource>,
    service: OnceCell<ServiceConfig>,
}

impl Settings {
    pub fn new(params: LaunchParams, source: Arc<dyn ConfigSource>) -> Self {
        Self {
            params,
            source,
            service: OnceCell::new(),
        }
    }

    /// Settings with an already known service configuration
    pub fn with_service(
        params: LaunchParams,
        source: Arc<dyn ConfigSource>,
        service: ServiceConfig,
    ) -> Self {
        Self {
            params,
            source,
            service: OnceCell::new_with(Some(service)),
        }
    }

    /// Service configuration, fetched on first use
    pub async fn service(&self) -> Result<&ServiceConfig, BridgeError> {
        self.service
            .get_or_try_init(|| async {
                tracing::debug!("[Config] Fetching configuration");
                self.source.load_service_config().await
            })
            .await
    }

    pub fn is_service_loaded(&self) -> bool {
        self.service.initialized()
    }
}
