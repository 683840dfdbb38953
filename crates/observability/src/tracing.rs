//! Tracing/logging initialization.
//!
//! JSON logs with timestamps; verbosity comes from `RUST_LOG`. The low-stock
//! monitor's alerts ride this pipeline, so the subscriber is installed before
//! the runner spawns.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
