//! Origin Authorization
//!
//! Checks the host page's declared origin against the allow-list before the
//! bridge does anything else. Allow-list entries are glob patterns where `*`
//! matches any substring (including the empty one) and every other character
//! is literal.


use crate::error::BridgeError;
use regex::Regex;

/// Compile an allow-list entry into an anchored regex
///
/// Runs of `*` collapse into a single `.*`; the literal segments in between
/// are escaped, so `.` or `?` in a pattern only ever match themselves.
pub fn wildcard_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut body = String::with_capacity(pattern.len() + 8);
    let mut pending_wildcard = false;

    for (i, segment) in pattern.split('*').enumerate() {
        if i > 0 {
            pending_wildcard = true;
        }
        if segment.is_empty() {
            continue;
        }
        if pending_wildcard {
            body.push_str(".*");
            pending_wildcard = false;
        }
        body.push_str(&regex::escape(segment));
    }
    if pending_wildcard {
        body.push_str(".*");
    }

    Regex::new(&format!("^{}$", body))
}

/// Full-string, case-sensitive match of an origin against one pattern
pub fn matches_origin(pattern: &str, origin: &str) -> bool {
    match wildcard_to_regex(pattern) {
        Ok(re) => re.is_match(origin),
        Err(e) => {
            tracing::warn!("[Origin] Skipping unusable allow-list entry '{}': {}", pattern, e);
            false
        }
    }
}

/// Authorize `origin` if any entry of `allow_list` matches it
pub fn authorize<S: AsRef<str>>(origin: &str, allow_list: &[S]) -> Result<(), BridgeError> {
    if allow_list
        .iter()
        .any(|pattern| matches_origin(pattern.as_ref(), origin))
    {
        tracing::debug!("[Origin] {} is allowed", origin);
        return Ok(());
    }

    Err(BridgeError::UnauthorizedOrigin {
        origin: origin.to_string(),
    })
}
