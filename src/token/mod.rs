//! Token Guard
//!
//! Reads the access token the authentication flow left in session storage and
//! checks it against the storage service before every use. Tokens are never
//! cached between events: the host's auth flow may replace them at any time.
//!
//! The storage service does not let us tell an expired token apart from any
//! other authentication failure, so a failed probe is classified by the
//! record's own expiry timestamp:
//! - expired: nothing to do, the auth flow refreshes it before the next event
//! - not expired: the credential is unusable; tell the host the selection is
//!   not ready, wipe session storage and reload the page

#[cfg(test)]
mod tests;

use crate::bridge::{HostContext, SelectionPayload};
use crate::config::{ServiceConfig, Settings};
use crate::remote_storage::StorageService;
use crate::session::{read_token_record, SessionStore};
use std::sync::Arc;
use time::OffsetDateTime;

/// How a failed probe is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The record's expiry lies in the past
    Expired,
    /// Still within its lifetime, yet refused
    Rejected,
}

/// Decide what a failed probe means for a token expiring at `expires_at`
pub fn classify_probe_failure(expires_at: i64, now: i64) -> ProbeFailure {
    if expires_at < now {
        ProbeFailure::Expired
    } else {
        ProbeFailure::Rejected
    }
}

/// Result of a token check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// No record in session storage
    Absent,
    Valid(String),
    Expired,
    /// Unusable credential; session cleared and reload requested
    Revoked,
}

impl TokenState {
    pub fn into_token(self) -> Option<String> {
        match self {
            TokenState::Valid(token) => Some(token),
            _ => None,
        }
    }
}

pub struct TokenGuard {
    settings: Arc<Settings>,
    session: Arc<dyn SessionStore>,
    service: Arc<dyn StorageService>,
    host: Arc<dyn HostContext>,
}

impl TokenGuard {
    pub fn new(
        settings: Arc<Settings>,
        session: Arc<dyn SessionStore>,
        service: Arc<dyn StorageService>,
        host: Arc<dyn HostContext>,
    ) -> Self {
        Self {
            settings,
            session,
            service,
            host,
        }
    }

    /// Current usable token, or `None` when unauthenticated
    pub async fn get_valid_access_token(&self, config: &ServiceConfig) -> Option<String> {
        self.check(config).await.into_token()
    }

    pub async fn check(&self, config: &ServiceConfig) -> TokenState {
        let oidc = &config.open_id_connect;
        let Some(record) = read_token_record(
            self.session.as_ref(),
            &oidc.authority,
            &oidc.client_id,
        ) else {
            tracing::debug!("[Token] No access token in session storage");
            return TokenState::Absent;
        };

        match self.service.probe(&config.server, &record.access_token).await {
            Ok(()) => TokenState::Valid(record.access_token),
            Err(e) => {
                let now = OffsetDateTime::now_utc().unix_timestamp();
                match classify_probe_failure(record.expires_at, now) {
                    ProbeFailure::Expired => {
                        tracing::debug!(
                            "[Token] Access token is expired, auth will take care of it"
                        );
                        TokenState::Expired
                    }
                    ProbeFailure::Rejected => {
                        tracing::info!(
                            "[Token] Access token does not seem to work ({}), cleaning up",
                            e
                        );
                        self.revoke();
                        TokenState::Revoked
                    }
                }
            }
        }
    }

    fn revoke(&self) {
        self.host
            .post_message(&SelectionPayload::not_ready(), &self.settings.params.origin);
        self.session.clear();
        self.host.reload();
    }
}
