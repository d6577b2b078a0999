//! Mocks and fixtures shared by the unit tests

use crate::bridge::{HostCommand, SelectionPayload};
use crate::config::{ConfigSource, LaunchParams, OpenIdConnectConfig, ServiceConfig, Variation};
use crate::error::BridgeError;
use crate::remote_storage::{ShareRequest, StorageError, StorageService};
use crate::session::{AccessTokenRecord, MemorySessionStore};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub const SERVER: &str = "https://s.example";
pub const AUTHORITY: &str = "https://idp.example";
pub const CLIENT_ID: &str = "picker";
pub const HOST_ORIGIN: &str = "https://host.example";

/// Storage service that records calls instead of talking HTTP
pub struct MockStorageService {
    probe_ok: AtomicBool,
    probe_calls: AtomicUsize,
    shares: Mutex<Vec<ShareRequest>>,
    failing_paths: Mutex<HashSet<String>>,
    share_delay: Option<Duration>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self {
            probe_ok: AtomicBool::new(true),
            probe_calls: AtomicUsize::new(0),
            shares: Mutex::new(Vec::new()),
            failing_paths: Mutex::new(HashSet::new()),
            share_delay: None,
        }
    }

    /// Every share request sleeps for `delay` before answering
    pub fn with_share_delay(delay: Duration) -> Self {
        Self {
            share_delay: Some(delay),
            ..Self::new()
        }
    }

    pub fn set_probe_ok(&self, ok: bool) {
        self.probe_ok.store(ok, Ordering::SeqCst);
    }

    /// Answer share requests for `path` with a body that has no token
    pub fn fail_share_for(&self, path: &str) {
        self.failing_paths.lock().unwrap().insert(path.to_string());
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn share_calls(&self) -> usize {
        self.shares.lock().unwrap().len()
    }

    pub fn shared_paths(&self) -> Vec<String> {
        self.shares
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.path.clone())
            .collect()
    }

    pub fn last_share(&self) -> Option<ShareRequest> {
        self.shares.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn probe(&self, _server: &str, _access_token: &str) -> Result<(), StorageError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        if self.probe_ok.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::Unauthorized { status: 401 })
        }
    }

    async fn create_share(
        &self,
        _server: &str,
        _access_token: Option<&str>,
        request: &ShareRequest,
    ) -> Result<String, StorageError> {
        let n = {
            let mut shares = self.shares.lock().unwrap();
            shares.push(request.clone());
            shares.len()
        };

        if let Some(delay) = self.share_delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_paths.lock().unwrap().contains(&request.path) {
            return Ok("<ocs><meta><status>failure</status><statuscode>404</statuscode></meta></ocs>".to_string());
        }

        Ok(format!(
            "<?xml version=\"1.0\"?><ocs><data><token>tok{}</token></data></ocs>",
            n
        ))
    }
}

/// Config source with fixed contents that counts service config loads
pub struct StaticConfigSource {
    service: ServiceConfig,
    origins: Vec<String>,
    service_loads: AtomicUsize,
}

impl StaticConfigSource {
    pub fn new(origins: &[&str]) -> Self {
        Self {
            service: service_config(),
            origins: origins.iter().map(|o| o.to_string()).collect(),
            service_loads: AtomicUsize::new(0),
        }
    }

    pub fn service_loads(&self) -> usize {
        self.service_loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn load_service_config(&self) -> Result<ServiceConfig, BridgeError> {
        self.service_loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.service.clone())
    }

    async fn load_allowed_origins(&self) -> Result<Vec<String>, BridgeError> {
        Ok(self.origins.clone())
    }
}

pub fn service_config() -> ServiceConfig {
    ServiceConfig {
        server: SERVER.to_string(),
        open_id_connect: OpenIdConnectConfig {
            authority: AUTHORITY.to_string(),
            client_id: CLIENT_ID.to_string(),
        },
    }
}

pub fn launch_params(variation: Variation, public_link: bool) -> LaunchParams {
    LaunchParams {
        debug: false,
        origin: HOST_ORIGIN.to_string(),
        variation,
        public_link,
        public_link_duration: None,
        public_link_description: None,
    }
}

/// Session store holding a token record for the fixture identity
pub fn session_with_token(token: &str, expires_at: i64) -> Arc<MemorySessionStore> {
    let store = Arc::new(MemorySessionStore::new());
    store
        .insert_token_record(
            AUTHORITY,
            CLIENT_ID,
            &AccessTokenRecord {
                access_token: token.to_string(),
                expires_at,
            },
        )
        .unwrap();
    store
}

/// Expiry one hour from now
pub fn future_expiry() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp() + 3600
}

/// Expiry one hour ago
pub fn past_expiry() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp() - 3600
}

/// Everything the host has received so far
pub fn drain(rx: &mut mpsc::UnboundedReceiver<HostCommand>) -> Vec<HostCommand> {
    let mut commands = Vec::new();
    while let Ok(command) = rx.try_recv() {
        commands.push(command);
    }
    commands
}

/// Posted payloads only, asserting they all targeted the host origin
pub fn posted(commands: &[HostCommand]) -> Vec<SelectionPayload> {
    commands
        .iter()
        .filter_map(|c| match c {
            HostCommand::PostMessage {
                payload,
                target_origin,
            } => {
                assert_eq!(target_origin, HOST_ORIGIN);
                Some(payload.clone())
            }
            HostCommand::Reload => None,
        })
        .collect()
}
