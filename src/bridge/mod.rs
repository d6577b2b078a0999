//! File Picker Bridge Module
//!
//! Wires the picker widget to the host page: authorizes the host's origin,
//! then broadcasts every selection change as a message the host can consume.

mod broadcaster;
mod host;
mod protocol;

pub use broadcaster::{BroadcastState, Broadcaster};
pub use host::{ChannelHost, HostCommand, HostContext};
pub use protocol::{PickedResource, SelectionEvent, SelectionPayload};

use crate::config::{ConfigSource, LaunchParams, Settings};
use crate::error::BridgeError;
use crate::links::{LinkResolver, ResolveMode};
use crate::logging;
use crate::origin;
use crate::remote_storage::StorageService;
use crate::session::SessionStore;
use crate::token::{TokenGuard, TokenState};
use std::sync::Arc;

/// Startup sequence of a picker page
pub struct FilePickerBridge;

impl FilePickerBridge {
    /// Parse the page query string and start the bridge
    pub async fn start_from_query(
        query: &str,
        source: Arc<dyn ConfigSource>,
        session: Arc<dyn SessionStore>,
        host: Arc<dyn HostContext>,
        service: Arc<dyn StorageService>,
    ) -> Result<Arc<Broadcaster>, BridgeError> {
        let params = LaunchParams::from_query(query)?;
        Self::start(params, source, session, host, service).await
    }

    /// Authorize the host origin, load the service configuration and check
    /// the stored token once
    ///
    /// Nothing is posted to the host and no broadcaster exists unless the
    /// origin passes the allow-list.
    ///
    /// Installs the crate's tracing subscriber at the level the `debug`
    /// launch parameter selects, unless the embedder already set one up.
    pub async fn start(
        params: LaunchParams,
        source: Arc<dyn ConfigSource>,
        session: Arc<dyn SessionStore>,
        host: Arc<dyn HostContext>,
        service: Arc<dyn StorageService>,
    ) -> Result<Arc<Broadcaster>, BridgeError> {
        logging::init_logging(params.debug);

        let allowed_origins = source.load_allowed_origins().await?;
        if let Err(e) = origin::authorize(&params.origin, &allowed_origins) {
            tracing::error!("[Bridge] {}", e);
            return Err(e);
        }

        let mode = ResolveMode::from_params(&params);
        let settings = Arc::new(Settings::new(params, source));
        settings.service().await?;

        let guard = TokenGuard::new(
            Arc::clone(&settings),
            Arc::clone(&session),
            Arc::clone(&service),
            Arc::clone(&host),
        );
        let resolver = LinkResolver::new(mode, service);
        let broadcaster = Arc::new(Broadcaster::new(
            Arc::clone(&settings),
            session,
            host,
            guard,
            resolver,
        ));

        match broadcaster.refresh_token().await? {
            TokenState::Valid(_) => tracing::info!("[Bridge] Started with a valid access token"),
            state => tracing::info!("[Bridge] Started without usable access token ({:?})", state),
        }

        Ok(broadcaster)
    }
}
