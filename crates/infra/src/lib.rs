//! Infrastructure layer: the transactional store, the checkout
//! orchestrator, alert sinks, and the low-stock monitor runner.

pub mod checkout;
pub mod monitor;
pub mod store;


pub use checkout::{CheckoutError, CheckoutOrchestrator};
pub use monitor::{InMemoryAlertSink, LowStockRunner, LowStockRunnerHandle, TracingAlertSink};
pub use store::{
    AppliedDecrement, CheckoutStore, CommittedOrder, InMemoryStore, OrderStore, StoreError,
};
