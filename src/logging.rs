//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Levels used across the crate:
//!
//! - `warn`: failed loads, rejected filter input, stale load results
//! - `info`: load and import results
//! - `debug`: individual view actions
//!
//! Product rows are never logged beyond their id and name.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_DIRECTIVE: &str = "product_table=info";

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Used when `RUST_LOG` is unset or unparsable.
    pub default_directive: String,
    pub with_target: bool,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_directive: DEFAULT_DIRECTIVE.to_string(),
            with_target: false,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.default_directive))
    }
}

/// Installs the global subscriber. A second call fails without side effects.
pub fn init_logging(config: &LogConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let fmt_layer = fmt::layer()
        .with_target(config.with_target)
        .with_ansi(config.with_ansi)
        .compact();

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
}
