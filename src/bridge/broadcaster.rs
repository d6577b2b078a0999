//! Selection Broadcaster
//!
//! Reacts to widget `update` events and posts the resulting selection to the
//! host page. Each event runs through the same states:
//!
//! Idle -> Resolving (post "not ready") -> Emitted (post result) -> Idle
//!
//! A failed resolution goes straight back to Idle without a second message.
//! Events are handled one at a time; a second event waits for the first.

use super::host::HostContext;
use super::protocol::{SelectionEvent, SelectionPayload};
use crate::config::{Settings, Variation};
use crate::error::BridgeError;
use crate::links::LinkResolver;
use crate::session::{SessionStore, USERNAME_KEY};
use crate::token::{TokenGuard, TokenState};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastState {
    Idle,
    Resolving,
    Emitted,
}

pub struct Broadcaster {
    settings: Arc<Settings>,
    session: Arc<dyn SessionStore>,
    host: Arc<dyn HostContext>,
    guard: TokenGuard,
    resolver: LinkResolver,
    state: Mutex<BroadcastState>,
    // Serializes event handling
    event_lock: tokio::sync::Mutex<()>,
}

impl Broadcaster {
    pub fn new(
        settings: Arc<Settings>,
        session: Arc<dyn SessionStore>,
        host: Arc<dyn HostContext>,
        guard: TokenGuard,
        resolver: LinkResolver,
    ) -> Self {
        Self {
            settings,
            session,
            host,
            guard,
            resolver,
            state: Mutex::new(BroadcastState::Idle),
            event_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn state(&self) -> BroadcastState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(BroadcastState::Idle)
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    pub fn resolver(&self) -> &LinkResolver {
        &self.resolver
    }

    /// Check the stored token once, outside of any event
    pub async fn refresh_token(&self) -> Result<TokenState, BridgeError> {
        let config = self.settings.service().await?;
        Ok(self.guard.check(config).await)
    }

    /// Consume widget events until the widget side goes away
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<SelectionEvent>) {
        tracing::info!(
            "[Broadcaster] Listening for selection updates ({:?})",
            self.settings.params.variation
        );

        while let Some(event) = events.recv().await {
            if let Err(e) = self.handle_update(&event).await {
                tracing::warn!("[Broadcaster] Selection update aborted: {}", e);
            }
        }

        tracing::info!("[Broadcaster] Widget event stream closed");
    }

    /// Handle one `update` event from the widget
    pub async fn handle_update(&self, event: &SelectionEvent) -> Result<(), BridgeError> {
        let _serial = self.event_lock.lock().await;

        let result = match self.settings.params.variation {
            Variation::Resource => self.handle_resource(event).await,
            Variation::Location => self.handle_location(event).await,
        };

        self.set_state(BroadcastState::Idle);
        result
    }

    async fn handle_resource(&self, event: &SelectionEvent) -> Result<(), BridgeError> {
        self.begin_resolving();

        let config = self.settings.service().await?;
        let token = match self.guard.check(config).await {
            TokenState::Revoked => return Ok(()),
            state => state.into_token(),
        };

        let paths = event.paths();
        let files = self
            .resolver
            .resolve(&config.server, &paths, token.as_deref())
            .await?;

        self.emit(SelectionPayload::resolved(files));
        Ok(())
    }

    async fn handle_location(&self, event: &SelectionEvent) -> Result<(), BridgeError> {
        let paths = event.paths();

        // An empty selection is "not ready", never "ready with nothing"
        if paths.is_empty() {
            self.send(&SelectionPayload::not_ready());
            return Ok(());
        }

        self.begin_resolving();

        let config = self.settings.service().await?;
        let token = match self.guard.check(config).await {
            TokenState::Revoked => return Ok(()),
            state => state.into_token(),
        };
        let username = self.session.get(USERNAME_KEY);

        self.emit(SelectionPayload::location(paths, username, token));
        Ok(())
    }

    fn begin_resolving(&self) {
        self.set_state(BroadcastState::Resolving);
        // Clear whatever the host holds before the new work starts
        self.send(&SelectionPayload::not_ready());
    }

    fn emit(&self, payload: SelectionPayload) {
        self.send(&payload);
        self.set_state(BroadcastState::Emitted);
    }

    fn send(&self, payload: &SelectionPayload) {
        self.host.post_message(payload, &self.settings.params.origin);
    }

    fn set_state(&self, state: BroadcastState) {
        if let Ok(mut current) = self.state.lock() {
            tracing::trace!("[Broadcaster] {:?} -> {:?}", *current, state);
            *current = state;
        }
    }
}
