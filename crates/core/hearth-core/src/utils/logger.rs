//! Logging setup

use crate::{HearthError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Resolve the filter directive: `RUST_LOG`, then `HEARTH_LOG_LEVEL`, then `default_level`
fn filter_directive(default_level: &str) -> String {
    std::env::var("RUST_LOG")
        .or_else(|_| std::env::var("HEARTH_LOG_LEVEL"))
        .unwrap_or_else(|_| default_level.to_string())
}

/// Initialize the global logging system.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(default_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(filter_directive(default_level))
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| HearthError::config(format!("invalid log filter: {}", e)))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| HearthError::config(format!("logging already initialized: {}", e)))
}
