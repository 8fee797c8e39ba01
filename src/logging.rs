//! Structured logging setup.
//!
//! The launcher calls [`init`] once at startup; plugins and background checks
//! log through the `tracing` macros.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. Returns `false` if
/// a subscriber was already installed (by the host application or a test).
pub fn init(config: &LoggingConfig) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.filter.as_str().into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
