//! Low-stock monitor adapters: alert sinks and the periodic runner.
//!
//! The sweep itself is pure (`vitrine_stock::run_sweep`); these components
//! schedule it and carry its output. Failures here are isolated and must
//! not impact checkout traffic.

pub mod runner;
pub mod sinks;

pub use runner::{LowStockRunner, LowStockRunnerHandle};
pub use sinks::{InMemoryAlertSink, TracingAlertSink};
