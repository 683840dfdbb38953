use std::sync::Mutex;

use tracing::warn;

use vitrine_stock::{AlertError, AlertSink, LowStockAlert};

/// Production sink: structured warning per alert.
///
/// Notification delivery (email/SMS) is out of scope; operators consume
/// these from the log pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlertSink;

impl TracingAlertSink {
    pub fn new() -> Self {
        Self
    }
}

impl AlertSink for TracingAlertSink {
    fn emit(&self, alert: &LowStockAlert) -> Result<(), AlertError> {
        warn!(
            target_row = %alert.target,
            product = %alert.product_name,
            descriptor = alert.descriptor.as_deref().unwrap_or(""),
            quantity = alert.quantity,
            minimum = alert.minimum_stock,
            "stock at or below minimum threshold"
        );
        Ok(())
    }
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAlertSink {
    inner: Mutex<Vec<LowStockAlert>>,
}

impl InMemoryAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<LowStockAlert> {
        self.inner.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl AlertSink for InMemoryAlertSink {
    fn emit(&self, alert: &LowStockAlert) -> Result<(), AlertError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AlertError("sink lock poisoned".to_string()))?;
        inner.push(alert.clone());
        Ok(())
    }
}
