//! Checkout execution pipeline (application-level orchestration).
//!
//! The orchestrator composes the pure planning step from `vitrine-checkout`
//! with the transactional store:
//!
//! ```text
//! PlaceOrder request
//!   ↓
//! 1. Plan: resolve catalog quotes, validate, price, pre-check stock
//!   ↓
//! 2. Commit: order insert + conditional decrements, one atomic unit
//!   ↓
//! 3. Warn: best-effort low-stock alerts for rows that fell to threshold
//! ```
//!
//! Step 1's availability check is descriptive only; step 2 re-checks under
//! the store's lock, so concurrent checkouts cannot oversell however the
//! pre-checks interleave. Step 3 happens strictly after the commit — no
//! alert I/O ever sits inside the transaction boundary.

use thiserror::Error;
use tracing::warn;

use vitrine_catalog::CatalogReader;
use vitrine_checkout::{plan, PlaceOrder};
use vitrine_core::{DomainError, EntityId};
use vitrine_orders::{Order, OrderId};
use vitrine_stock::{AlertSink, LowStockAlert};

use crate::store::{CheckoutStore, CommittedOrder, StoreError};

/// Checkout failure as surfaced to the API boundary.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Request-shape failure (deterministic).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Referenced product/variation does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Requested quantity exceeds availability — raised by the pre-check or,
    /// after a lost race, by the commit itself.
    #[error("insufficient stock for {product_name} ({product_id}): requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        product_name: String,
        requested: i64,
        available: i64,
    },

    /// Domain invariant failure.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Unexpected storage failure; the transaction was already rolled back.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for CheckoutError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => CheckoutError::Validation(msg),
            DomainError::InvalidId(msg) => CheckoutError::Validation(msg),
            DomainError::NotFound(what) => CheckoutError::NotFound(what),
            DomainError::InvariantViolation(msg) => CheckoutError::InvariantViolation(msg),
            DomainError::InsufficientStock {
                product_id,
                product_name,
                requested,
                available,
            } => CheckoutError::InsufficientStock {
                product_id,
                product_name,
                requested,
                available,
            },
        }
    }
}

impl From<StoreError> for CheckoutError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(what) => CheckoutError::NotFound(what),
            StoreError::InsufficientStock {
                product_id,
                product_name,
                requested,
                available,
            } => CheckoutError::InsufficientStock {
                product_id,
                product_name,
                requested,
                available,
            },
            StoreError::InvariantViolation(msg) => CheckoutError::InvariantViolation(msg),
            StoreError::Conflict(msg) => CheckoutError::Internal(msg),
            StoreError::Internal(msg) => CheckoutError::Internal(msg),
        }
    }
}

/// The transactional checkout use case.
///
/// Generic over its ports so tests compose it with in-memory
/// implementations; the alert sink is injected rather than reached through
/// a global logger, so emission is observable in tests and swappable in
/// production wiring.
#[derive(Debug)]
pub struct CheckoutOrchestrator<S, A> {
    store: S,
    alerts: A,
}

impl<S, A> CheckoutOrchestrator<S, A> {
    pub fn new(store: S, alerts: A) -> Self {
        Self { store, alerts }
    }
}

impl<S, A> CheckoutOrchestrator<S, A>
where
    S: CatalogReader + CheckoutStore,
    A: AlertSink,
{
    /// Turn a cart into a committed order.
    ///
    /// Returns the order exactly as persisted; on any error, neither the
    /// order nor any decrement was applied.
    pub fn place_order(&self, request: &PlaceOrder) -> Result<Order, CheckoutError> {
        let order_id = OrderId::new(EntityId::new());
        let now = chrono::Utc::now();

        let plan = plan(&self.store, order_id, request, now)?;
        let committed = self.store.commit_order(plan.order, &plan.decrements)?;

        self.warn_low_stock(&committed);

        Ok(committed.order)
    }

    /// Post-commit warning pass: any row that fell to or under its threshold
    /// goes to the alert sink. Emission errors are logged and swallowed —
    /// the order already committed.
    fn warn_low_stock(&self, committed: &CommittedOrder) {
        for applied in &committed.applied {
            let Some(minimum) = applied.minimum_stock else {
                continue;
            };
            if applied.new_quantity > minimum {
                continue;
            }

            let alert = LowStockAlert {
                target: applied.target,
                product_name: applied.product_name.clone(),
                descriptor: applied.descriptor.clone(),
                quantity: applied.new_quantity,
                minimum_stock: minimum,
            };
            if let Err(e) = self.alerts.emit(&alert) {
                warn!(
                    order = %committed.order.id_typed(),
                    target_row = %alert.target,
                    error = %e,
                    "failed to emit post-checkout low-stock alert"
                );
            }
        }
    }
}
