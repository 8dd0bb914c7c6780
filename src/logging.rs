//! Tracing setup for the `local-store` binary
//!
//! The library only emits events; subscribers are installed here, by the binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, config};

/// Install a stderr subscriber
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` and the default is `warn`.
///
/// # Errors
///
/// Returns `StoreError::ConfigInvalid` if the filter cannot be built or a subscriber is
/// already installed.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("local_store={level}")))
        .map_err(|e| config::invalid(format!("Failed to create tracing filter: {e}")))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| config::invalid(format!("Failed to initialize tracing: {e}")))
}
