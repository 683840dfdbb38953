use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use vitrine_core::DomainResult;

use crate::ledger::{StockLedger, StockStatus, StockTarget};

/// Structured low-stock warning.
///
/// Emitted by the hourly sweep for rows strictly under threshold, and by
/// checkout for rows that fell to or under threshold after a decrement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub target: StockTarget,
    pub product_name: String,
    /// Color/size label when the row is a variation.
    pub descriptor: Option<String>,
    pub quantity: i64,
    pub minimum_stock: i64,
}

impl LowStockAlert {
    /// Sweep rule: alert only when the row has a threshold and sits strictly
    /// below it. Checkout's post-commit warning uses `≤` instead; both
    /// comparisons are the reference behavior.
    pub fn from_status(status: &StockStatus) -> Option<Self> {
        let minimum = status.minimum_stock?;
        if status.quantity >= minimum {
            return None;
        }
        Some(Self {
            target: status.target,
            product_name: status.product_name.clone(),
            descriptor: status.descriptor.clone(),
            quantity: status.quantity,
            minimum_stock: minimum,
        })
    }
}

/// Alert emission failure. Alerting is best-effort everywhere: callers log
/// this and move on.
#[derive(Debug, Error)]
#[error("alert emission failed: {0}")]
pub struct AlertError(pub String);

/// Sink for low-stock alerts.
///
/// Intentionally separate from the order/stock write path: alerts are
/// operational signals, not domain state.
pub trait AlertSink: Send + Sync {
    fn emit(&self, alert: &LowStockAlert) -> Result<(), AlertError>;
}

impl<S> AlertSink for Arc<S>
where
    S: AlertSink + ?Sized,
{
    fn emit(&self, alert: &LowStockAlert) -> Result<(), AlertError> {
        (**self).emit(alert)
    }
}

/// Outcome of one monitor sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Rows read from the ledger.
    pub scanned: usize,
    /// Alerts successfully emitted.
    pub alerted: usize,
    /// Alerts that failed to emit (logged, not propagated).
    pub emit_failures: usize,
}

/// One pass of the low-stock monitor: read every stock row, emit an alert
/// per row strictly under its threshold.
///
/// Pure read-and-report: never mutates stock. A snapshot failure is returned
/// to the caller (the runner logs it and retries on the next tick); an
/// emission failure is logged here and counted, never propagated.
pub fn run_sweep<L, S>(ledger: &L, sink: &S) -> DomainResult<SweepReport>
where
    L: StockLedger + ?Sized,
    S: AlertSink + ?Sized,
{
    let statuses = ledger.snapshot()?;

    let mut report = SweepReport {
        scanned: statuses.len(),
        ..SweepReport::default()
    };

    for status in &statuses {
        let Some(alert) = LowStockAlert::from_status(status) else {
            continue;
        };
        match sink.emit(&alert) {
            Ok(()) => report.alerted += 1,
            Err(e) => {
                warn!(
                    target_row = %alert.target,
                    product = %alert.product_name,
                    error = %e,
                    "failed to emit low-stock alert"
                );
                report.emit_failures += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use vitrine_catalog::{ProductId, VariationId};
    use vitrine_core::{DomainError, EntityId};

    struct FakeLedger {
        statuses: DomainResult<Vec<StockStatus>>,
    }

    impl StockLedger for FakeLedger {
        fn available(&self, _target: &StockTarget) -> DomainResult<i64> {
            unimplemented!("sweep only reads snapshots")
        }

        fn decrement(&self, _target: &StockTarget, _amount: i64) -> DomainResult<i64> {
            unimplemented!("sweep never mutates stock")
        }

        fn set_levels(
            &self,
            _target: &StockTarget,
            _quantity: Option<i64>,
            _minimum: Option<i64>,
        ) -> DomainResult<()> {
            unimplemented!("sweep never mutates stock")
        }

        fn snapshot(&self) -> DomainResult<Vec<StockStatus>> {
            self.statuses.clone()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        alerts: Mutex<Vec<LowStockAlert>>,
        fail: bool,
    }

    impl AlertSink for RecordingSink {
        fn emit(&self, alert: &LowStockAlert) -> Result<(), AlertError> {
            if self.fail {
                return Err(AlertError("sink unavailable".to_string()));
            }
            self.alerts.lock().unwrap().push(alert.clone());
            Ok(())
        }
    }

    fn variation_status(quantity: i64, minimum: Option<i64>) -> StockStatus {
        StockStatus {
            target: StockTarget::Variation(VariationId::new(EntityId::new())),
            product_name: "Linen shirt".to_string(),
            descriptor: Some("black / 38".to_string()),
            quantity,
            minimum_stock: minimum,
        }
    }

    fn product_status(quantity: i64, minimum: Option<i64>) -> StockStatus {
        StockStatus {
            target: StockTarget::Product(ProductId::new(EntityId::new())),
            product_name: "Linen shirt".to_string(),
            descriptor: None,
            quantity,
            minimum_stock: minimum,
        }
    }

    #[test]
    fn alerts_rows_strictly_under_threshold() {
        let ledger = FakeLedger {
            statuses: Ok(vec![
                variation_status(4, Some(5)), // under
                variation_status(5, Some(5)), // at threshold: sweep stays quiet
                product_status(2, Some(10)),  // under
                product_status(3, None),      // no threshold configured
            ]),
        };
        let sink = RecordingSink::default();

        let report = run_sweep(&ledger, &sink).unwrap();
        assert_eq!(report.scanned, 4);
        assert_eq!(report.alerted, 2);
        assert_eq!(report.emit_failures, 0);

        let alerts = sink.alerts.lock().unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].quantity, 4);
        assert_eq!(alerts[0].minimum_stock, 5);
        assert_eq!(alerts[0].descriptor.as_deref(), Some("black / 38"));
    }

    #[test]
    fn quiet_sweep_has_no_side_effects() {
        let ledger = FakeLedger {
            statuses: Ok(vec![
                variation_status(9, Some(5)),
                product_status(100, Some(10)),
            ]),
        };
        let sink = RecordingSink::default();

        let report = run_sweep(&ledger, &sink).unwrap();
        assert_eq!(report.alerted, 0);
        assert!(sink.alerts.lock().unwrap().is_empty());
    }

    #[test]
    fn emission_failure_is_counted_not_propagated() {
        let ledger = FakeLedger {
            statuses: Ok(vec![variation_status(1, Some(5))]),
        };
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };

        let report = run_sweep(&ledger, &sink).unwrap();
        assert_eq!(report.alerted, 0);
        assert_eq!(report.emit_failures, 1);
    }

    #[test]
    fn snapshot_failure_is_returned_to_caller() {
        let ledger = FakeLedger {
            statuses: Err(DomainError::not_found("ledger offline")),
        };
        let sink = RecordingSink::default();

        assert!(run_sweep(&ledger, &sink).is_err());
    }
}
