//! Logging initialization.
//!
//! Output always goes to stderr: stdout carries the JSON-RPC stream when the
//! server is running.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging with a default filter, overridden by `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

/// Initialize logging for tests.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
