// src/remote_storage/mod.rs
//!
//! Remote Storage API
//!
//! The slice of the storage service's HTTP surface the bridge consumes:
//! an authenticated existence probe and public share creation.
//!

pub mod backend;
pub mod error;
pub mod types;


pub use backend::{OcsStorageService, StorageService};
pub use error::StorageError;
pub use types::*;
