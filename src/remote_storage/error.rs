// src/remote_storage/error.rs
//!
//! Storage Error Types
//!

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage service unreachable: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Storage service refused the request (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("Request failed: {reason}")]
    RequestFailed { reason: String },
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            StorageError::ConnectionFailed {
                reason: e.to_string(),
            }
        } else {
            StorageError::RequestFailed {
                reason: e.to_string(),
            }
        }
    }
}
