// src/remote_storage/types.rs
//!
//! Share Types - Request shapes for the sharing API
//!

use regex::Regex;
use std::sync::OnceLock;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

// ============================================================================
// Share Request Types
// ============================================================================

/// Share type as understood by the sharing API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareType {
    PublicLink = 3,
}

/// Permission bits granted on a share
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePermissions {
    Read = 1,
}

/// Request to create a share for one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub share_type: ShareType,
    /// Storage path of the shared resource
    pub path: String,
    pub permissions: SharePermissions,
    pub internal: bool,
    /// Expiry date (RFC 3339)
    pub expire_date: Option<String>,
    pub description: Option<String>,
}

impl ShareRequest {
    /// Read-only public link for `path`
    ///
    /// `duration_days` sets the expiry to now plus that many days. A duration
    /// past the representable date range sends no expiry at all.
    pub fn public_link(path: &str, duration_days: Option<u32>, description: Option<&str>) -> Self {
        Self {
            share_type: ShareType::PublicLink,
            path: path.to_string(),
            permissions: SharePermissions::Read,
            internal: true,
            expire_date: duration_days.and_then(expiry_from_now),
            description: description.map(String::from),
        }
    }

    /// Form fields in the order the sharing API documents them
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("shareType", (self.share_type as u8).to_string()),
            ("path", self.path.clone()),
            ("permissions", (self.permissions as u8).to_string()),
            ("internal", self.internal.to_string()),
        ];
        if let Some(expire_date) = &self.expire_date {
            fields.push(("expireDate", expire_date.clone()));
        }
        if let Some(description) = &self.description {
            fields.push(("description", description.clone()));
        }
        fields
    }
}

fn expiry_from_now(days: u32) -> Option<String> {
    let Some(expires) = OffsetDateTime::now_utc().checked_add(Duration::days(i64::from(days)))
    else {
        tracing::warn!(
            "[Storage] Link duration of {} days is out of range, sharing without expiry",
            days
        );
        return None;
    };
    expires.format(&Rfc3339).ok()
}

// ============================================================================
// Share Response Parsing
// ============================================================================

/// Extract the share token from an OCS XML response body
///
/// An empty `<token>` element counts as no token.
pub fn parse_share_token(body: &str) -> Option<String> {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    let re = TOKEN_RE.get_or_init(|| {
        Regex::new(r"<token>\s*([^<]*?)\s*</token>").expect("static token pattern")
    });

    re.captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|token| !token.is_empty())
}
