use std::sync::Arc;

use vitrine_checkout::PlaceOrder;
use vitrine_core::DomainResult;
use vitrine_infra::{
    CheckoutError, CheckoutOrchestrator, InMemoryStore, LowStockRunner, LowStockRunnerHandle,
    OrderStore, StoreError, TracingAlertSink,
};
use vitrine_orders::{Order, OrderId, OrderStatus};
use vitrine_stock::{StockLedger, StockTarget};

/// Application services behind the HTTP handlers.
///
/// One transactional in-memory store backs the catalog view, the stock
/// ledger and the order ledger; the orchestrator and the monitor share it.
/// Alerts go to the tracing sink in this wiring.
pub struct AppServices {
    store: Arc<InMemoryStore>,
    orchestrator: CheckoutOrchestrator<Arc<InMemoryStore>, Arc<TracingAlertSink>>,
    monitor: Option<LowStockRunnerHandle>,
}

impl AppServices {
    /// Production wiring: spawns the low-stock monitor alongside the store.
    pub fn new(runner: LowStockRunner) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let alerts = Arc::new(TracingAlertSink::new());
        let monitor = runner.spawn("monitor.low_stock", store.clone(), alerts.clone());

        Self {
            store: store.clone(),
            orchestrator: CheckoutOrchestrator::new(store, alerts),
            monitor: Some(monitor),
        }
    }

    /// Wiring without the background monitor (black-box tests drive sweeps
    /// explicitly when they need them).
    pub fn without_monitor() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let alerts = Arc::new(TracingAlertSink::new());

        Self {
            store: store.clone(),
            orchestrator: CheckoutOrchestrator::new(store, alerts),
            monitor: None,
        }
    }

    /// The backing store. Admin CRUD (out of scope here) seeds products and
    /// variations through this; tests do the same.
    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }

    pub fn place_order(&self, request: &PlaceOrder) -> Result<Order, CheckoutError> {
        self.orchestrator.place_order(request)
    }

    pub fn order(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        self.store.get(order_id)
    }

    pub fn orders(&self) -> Result<Vec<Order>, StoreError> {
        self.store.list()
    }

    pub fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        self.store.update_status(order_id, status)
    }

    pub fn available(&self, target: &StockTarget) -> DomainResult<i64> {
        self.store.available(target)
    }

    pub fn set_stock_levels(
        &self,
        target: &StockTarget,
        quantity: Option<i64>,
        minimum: Option<i64>,
    ) -> DomainResult<()> {
        self.store.set_levels(target, quantity, minimum)
    }
}

impl Drop for AppServices {
    fn drop(&mut self) {
        if let Some(monitor) = self.monitor.take() {
            monitor.shutdown();
        }
    }
}
