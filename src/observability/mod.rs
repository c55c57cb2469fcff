//! Logging setup for compras
//!
//! Events are emitted with `tracing` everywhere in the crate. This module
//! installs the global subscriber once, at process start.
//!
//! The filter comes from `RUST_LOG` (default `info`). Output is plain text,
//! or one JSON object per line when `log_json` is enabled.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "info";

/// Builds the level filter from the environment.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global tracing subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(log_json: bool) -> Result<(), TryInitError> {
    if log_json {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    }
}
