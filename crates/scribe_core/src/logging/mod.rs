//! Logging infrastructure.
//!
//! The pipeline logs through the `tracing` ecosystem; this module owns
//! process-wide subscriber setup. Stage and cleanup events are logged
//! where they happen with the standard `tracing` macros.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG` and falls back to the provided filter (e.g. the
/// `logging.level` setting). Call once at application startup.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

/// Initialize tracing for tests (warnings and above, test writer).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_init_is_reentrant() {
        init_test_tracing();
        init_test_tracing();
    }
}
