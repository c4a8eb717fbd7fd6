//! Logging setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber: `RUST_LOG` when set, `info` otherwise.
///
/// Output goes through the test writer so `cargo test` captures it per
/// test. Safe to call more than once; later calls do nothing.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_test_writer())
        .try_init();
}
