//! Protocol definitions for widget events and host messages

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One resource picked in the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedResource {
    /// Storage path, e.g. "/Documents/report.pdf"
    pub path: String,
}

impl PickedResource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// `update` event emitted by the picker widget
///
/// The widget's event detail is an argument list; its first element is the
/// current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEvent {
    #[serde(default)]
    pub detail: Vec<Vec<PickedResource>>,
}

impl SelectionEvent {
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            detail: vec![paths.into_iter().map(PickedResource::new).collect()],
        }
    }

    /// Selected paths in widget order
    pub fn paths(&self) -> Vec<String> {
        self.detail
            .first()
            .map(|resources| resources.iter().map(|r| r.path.clone()).collect())
            .unwrap_or_default()
    }
}

/// Message posted to the host page
///
/// `ready: false` tells the host to discard whatever it received before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum SelectionPayload {
    /// Resolved URLs (resource variation)
    Resource { files: Vec<String>, ready: bool },
    /// Raw paths plus identity (location variation)
    Location {
        files: Vec<String>,
        username: Option<String>,
        #[serde(rename = "accessToken")]
        access_token: Option<String>,
        ready: bool,
    },
}

impl SelectionPayload {
    pub fn not_ready() -> Self {
        SelectionPayload::Resource {
            files: Vec::new(),
            ready: false,
        }
    }

    pub fn resolved(files: Vec<String>) -> Self {
        SelectionPayload::Resource { files, ready: true }
    }

    pub fn location(
        files: Vec<String>,
        username: Option<String>,
        access_token: Option<String>,
    ) -> Self {
        SelectionPayload::Location {
            files,
            username,
            access_token,
            ready: true,
        }
    }

    pub fn is_ready(&self) -> bool {
        match self {
            SelectionPayload::Resource { ready, .. } | SelectionPayload::Location { ready, .. } => {
                *ready
            }
        }
    }

    pub fn files(&self) -> &[String] {
        match self {
            SelectionPayload::Resource { files, .. } | SelectionPayload::Location { files, .. } => {
                files
            }
        }
    }
}
