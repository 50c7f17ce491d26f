//! Diagnostic logging setup
//!
//! Installs a `tracing` subscriber writing to stderr. The filter comes from
//! `TALLY_LOG` when set, otherwise from the caller (normally
//! `Settings::log_filter`).

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "TALLY_LOG";

static TRACING_INIT: Once = Once::new();

/// Build the filter from the environment, falling back to `default_filter`
///
/// An unparseable directive falls back to `warn`.
pub fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber; later calls are no-ops
pub fn init(default_filter: &str) {
    TRACING_INIT.call_once(|| {
        let filter = build_filter(default_filter);
        // Another subscriber may already be installed by an embedding program
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init("debug");
        init("info");
        tracing::debug!("logging initialised twice without panicking");
    }

    #[test]
    fn test_build_filter_falls_back_on_garbage() {
        let filter = build_filter("tally=[[[");
        assert!(!filter.to_string().is_empty());
    }
}
