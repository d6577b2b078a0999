//! Session-scoped storage
//!
//! The external authentication flow writes the access token record and the
//! username here. The bridge only reads them, and clears the whole store when
//! a token turns out to be unusable.


use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Key under which the authentication flow stores the username
pub const USERNAME_KEY: &str = "sub";

/// Access token as stored by the OIDC client in session storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenRecord {
    pub access_token: String,
    /// Expiry as unix epoch seconds
    pub expires_at: i64,
}

/// Storage key of the token record for an OIDC identity
pub fn token_key(authority: &str, client_id: &str) -> String {
    format!("oc_oAuthuser:{}:{}", authority, client_id)
}

/// Session-scoped key/value storage
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Remove every entry
    fn clear(&self);
}

/// Read and decode the token record for an OIDC identity
///
/// A record that is not valid JSON is treated like a missing one.
pub fn read_token_record(
    store: &dyn SessionStore,
    authority: &str,
    client_id: &str,
) -> Option<AccessTokenRecord> {
    let raw = store.get(&token_key(authority, client_id))?;

    match serde_json::from_str::<AccessTokenRecord>(&raw) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!("[Session] Ignoring malformed access token record: {}", e);
            None
        }
    }
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), value.into());
        }
    }

    /// Store a token record the way the authentication flow does
    pub fn insert_token_record(
        &self,
        authority: &str,
        client_id: &str,
        record: &AccessTokenRecord,
    ) -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(record)?;
        self.insert(token_key(authority, client_id), json);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}
