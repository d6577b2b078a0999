//! Host page seam
//!
//! Everything the bridge does to the embedding page goes through
//! [`HostContext`]: posting selection messages and reloading the picker.

use super::protocol::SelectionPayload;
use tokio::sync::mpsc;

pub trait HostContext: Send + Sync {
    /// Post `payload` to the host window, restricted to `target_origin`
    ///
    /// Fire-and-forget: the host never acknowledges.
    fn post_message(&self, payload: &SelectionPayload, target_origin: &str);

    /// Reload the picker page
    fn reload(&self);
}

/// Command forwarded to whatever owns the real host window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    PostMessage {
        payload: SelectionPayload,
        target_origin: String,
    },
    Reload,
}

/// Host context backed by an unbounded channel
///
/// The receiving side (webview glue, test harness, ...) performs the actual
/// `postMessage` / reload.
#[derive(Clone)]
pub struct ChannelHost {
    tx: mpsc::UnboundedSender<HostCommand>,
}

impl ChannelHost {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<HostCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl HostContext for ChannelHost {
    fn post_message(&self, payload: &SelectionPayload, target_origin: &str) {
        tracing::debug!(
            "[Host] Sending message to parent {:?} -> {}",
            payload,
            target_origin
        );
        let command = HostCommand::PostMessage {
            payload: payload.clone(),
            target_origin: target_origin.to_string(),
        };
        if self.tx.send(command).is_err() {
            tracing::warn!("[Host] Host channel closed, message dropped");
        }
    }

    fn reload(&self) {
        if self.tx.send(HostCommand::Reload).is_err() {
            tracing::warn!("[Host] Host channel closed, reload dropped");
        }
    }
}
