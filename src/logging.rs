//! Tracing setup for hosts that embed the bridge

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber
///
/// `RUST_LOG` takes precedence; otherwise the `debug` launch parameter
/// switches between `debug` and `info`. [`FilePickerBridge::start`] calls this
/// with the parsed launch parameters; a subscriber the embedder installed
/// first stays in place. Calling this twice is harmless.
///
/// [`FilePickerBridge::start`]: crate::bridge::FilePickerBridge::start
pub fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("filepicker_bridge={}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
