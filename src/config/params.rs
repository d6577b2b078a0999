//! Launch parameters from the picker page's query string

use crate::error::BridgeError;
use std::collections::HashSet;

/// Which payload shape the broadcaster sends to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variation {
    /// Resolved file URLs
    Resource,
    /// Raw paths plus username and access token
    Location,
}

/// Startup parameters of one picker page instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParams {
    pub debug: bool,
    /// Declared origin of the host page
    pub origin: String,
    pub variation: Variation,
    pub public_link: bool,
    /// Days until a created public link expires
    pub public_link_duration: Option<u32>,
    pub public_link_description: Option<String>,
}

impl LaunchParams {
    /// Parse a query string such as `?origin=https://host&publicLink=1`
    pub fn from_query(query: &str) -> Result<Self, BridgeError> {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut debug = false;
        let mut origin = None;
        let mut location_picker = false;
        let mut public_link = false;
        let mut public_link_duration = None;
        let mut public_link_description = None;

        // First occurrence wins, like URLSearchParams::get
        let mut seen = HashSet::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if !seen.insert(key.to_string()) {
                continue;
            }
            let value = value.into_owned();
            match &*key {
                "debug" => debug = !value.is_empty(),
                "origin" => origin = Some(value).filter(|v| !v.is_empty()),
                "locationPicker" => location_picker = !value.is_empty(),
                "publicLink" => public_link = !value.is_empty(),
                "publicLinkDuration" => public_link_duration = parse_duration_days(&value),
                "publicLinkDescription" => {
                    public_link_description = Some(value).filter(|v| !v.is_empty())
                }
                _ => {}
            }
        }

        let origin = origin.ok_or(BridgeError::MissingOrigin)?;

        Ok(Self {
            debug,
            origin,
            variation: if location_picker {
                Variation::Location
            } else {
                Variation::Resource
            },
            public_link,
            public_link_duration,
            public_link_description,
        })
    }
}

/// Leading decimal digits as days; zero or no digits means no expiry
fn parse_duration_days(value: &str) -> Option<u32> {
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse::<u32>().ok().filter(|days| *days > 0)
}
