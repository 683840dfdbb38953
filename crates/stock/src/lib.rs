//! `vitrine-stock` — the stock ledger port, low-stock alerting, and the
//! monitor's pure sweep + schedule.

pub mod ledger;
pub mod monitor;
pub mod schedule;

pub use ledger::{StockDecrement, StockLedger, StockStatus, StockTarget};
pub use monitor::{run_sweep, AlertError, AlertSink, LowStockAlert, SweepReport};
pub use schedule::{SweepSchedule, DEFAULT_SWEEP_INTERVAL};
