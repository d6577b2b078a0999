//! Link Resolver
//!
//! Turns selected storage paths into URLs the host page can use:
//! - basic mode embeds the access token in a direct WebDAV URL
//! - public-link mode creates one read-only public share per path and hands
//!   out its token-free download URL
//!
//! Public links are cached per path for the lifetime of the resolver, which
//! is one picking session. A path never gets a second share.


use crate::config::LaunchParams;
use crate::error::BridgeError;
use crate::remote_storage::backend::WEBDAV_PATH;
use crate::remote_storage::{parse_share_token, ShareRequest, StorageService};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Characters `encodeURIComponent` leaves alone
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const PUBLIC_FILES_PATH: &str = "/remote.php/dav/public-files";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveMode {
    Basic,
    PublicLink {
        duration_days: Option<u32>,
        description: Option<String>,
    },
}

impl ResolveMode {
    pub fn from_params(params: &LaunchParams) -> Self {
        if params.public_link {
            ResolveMode::PublicLink {
                duration_days: params.public_link_duration,
                description: params.public_link_description.clone(),
            }
        } else {
            ResolveMode::Basic
        }
    }
}

/// Direct download URL carrying the access token as query credential
///
/// An unauthenticated caller gets an empty token; the host treats that URL as
/// unusable.
pub fn basic_url(server: &str, path: &str, access_token: Option<&str>) -> String {
    format!(
        "{}{}{}?access_token={}",
        server,
        WEBDAV_PATH,
        path,
        access_token.unwrap_or("")
    )
}

/// Public download URL for a share token, named after the path's last segment
pub fn public_url(server: &str, share_token: &str, path: &str) -> String {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    format!(
        "{}{}/{}/{}",
        server,
        PUBLIC_FILES_PATH,
        share_token,
        utf8_percent_encode(file_name, URI_COMPONENT)
    )
}

/// Public links created so far, keyed by storage path
#[derive(Debug, Default)]
pub struct PublicLinkCache {
    links: HashMap<String, String>,
}

impl PublicLinkCache {
    pub fn get(&self, path: &str) -> Option<&String> {
        self.links.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.links.contains_key(path)
    }

    pub fn insert(&mut self, path: String, url: String) {
        self.links.insert(path, url);
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

pub struct LinkResolver {
    mode: ResolveMode,
    service: Arc<dyn StorageService>,
    cache: Mutex<PublicLinkCache>,
}

impl LinkResolver {
    pub fn new(mode: ResolveMode, service: Arc<dyn StorageService>) -> Self {
        Self {
            mode,
            service,
            cache: Mutex::new(PublicLinkCache::default()),
        }
    }

    pub fn mode(&self) -> &ResolveMode {
        &self.mode
    }

    /// One URL per input path, in input order
    pub async fn resolve(
        &self,
        server: &str,
        paths: &[String],
        access_token: Option<&str>,
    ) -> Result<Vec<String>, BridgeError> {
        match &self.mode {
            ResolveMode::Basic => Ok(paths
                .iter()
                .map(|path| basic_url(server, path, access_token))
                .collect()),
            ResolveMode::PublicLink {
                duration_days,
                description,
            } => {
                // Held across the share requests so overlapping callers never
                // create a second link for the same path
                let mut cache = self.cache.lock().await;

                for path in paths {
                    if cache.contains(path) {
                        continue;
                    }
                    let url = self
                        .create_public_link(
                            server,
                            path,
                            access_token,
                            *duration_days,
                            description.as_deref(),
                        )
                        .await?;
                    cache.insert(path.clone(), url);
                }

                tracing::debug!("[Links] Public link cache holds {} entries", cache.len());

                paths
                    .iter()
                    .map(|path| {
                        cache.get(path).cloned().ok_or_else(|| BridgeError::ShareCreation {
                            path: path.clone(),
                            reason: "no cached link".to_string(),
                        })
                    })
                    .collect()
            }
        }
    }

    async fn create_public_link(
        &self,
        server: &str,
        path: &str,
        access_token: Option<&str>,
        duration_days: Option<u32>,
        description: Option<&str>,
    ) -> Result<String, BridgeError> {
        let request = ShareRequest::public_link(path, duration_days, description);

        let body = self
            .service
            .create_share(server, access_token, &request)
            .await
            .map_err(|e| BridgeError::ShareCreation {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let share_token = parse_share_token(&body).ok_or_else(|| BridgeError::ShareCreation {
            path: path.to_string(),
            reason: "response carries no share token".to_string(),
        })?;

        tracing::debug!("[Links] Created public link for {}", path);
        Ok(public_url(server, &share_token, path))
    }

    /// Number of cached public links
    pub async fn cached_links(&self) -> usize {
        self.cache.lock().await.len()
    }
}
