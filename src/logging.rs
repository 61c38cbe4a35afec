//! Diagnostic logging setup for the command line tools.
//!
//! Library code only emits `tracing` events; binaries call `init` once so the
//! events reach stderr. Stdout stays reserved for tool output.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding the `EnvFilter` directives.
pub const LOG_ENV: &str = "EDUROBOLAB_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Filter built from `EDUROBOLAB_LOG`, or `warn` when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the stderr subscriber. Safe to call more than once.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter())
        .try_init();
}
