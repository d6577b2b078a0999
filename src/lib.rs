//! Bridge between an embedded file picker and the host page that embeds it.
//!
//! The host never sees storage credentials unless it asks for them: it gets
//! authenticated file URLs, public share links or raw paths, posted only to
//! its own allow-listed origin.

pub mod bridge;
pub mod config;
pub mod error;
pub mod links;
pub mod logging;
pub mod origin;
pub mod remote_storage;
pub mod session;
pub mod token;

#[cfg(test)]
mod test_helpers;

pub use bridge::{
    BroadcastState, Broadcaster, ChannelHost, FilePickerBridge, HostCommand, HostContext,
    PickedResource, SelectionEvent, SelectionPayload,
};
pub use config::{LaunchParams, ServiceConfig, Settings, Variation};
pub use error::BridgeError;
pub use links::{LinkResolver, ResolveMode};
pub use session::{AccessTokenRecord, MemorySessionStore, SessionStore};
pub use token::{TokenGuard, TokenState};
