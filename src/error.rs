//! Error types for the file picker bridge

use thiserror::Error;

use crate::remote_storage::StorageError;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("You must specify an origin query parameter")]
    MissingOrigin,

    #[error("Invalid origin {origin}")]
    UnauthorizedOrigin { origin: String },

    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("Share creation failed for {path}: {reason}")]
    ShareCreation { path: String, reason: String },

    #[error("Storage service error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
