use std::sync::Arc;

use thiserror::Error;

use vitrine_orders::{Order, OrderId, OrderStatus};
use vitrine_stock::{StockDecrement, StockTarget};

/// Storage operation error.
///
/// Infrastructure failures (conflicts, storage faults) plus the authoritative
/// availability check raised by the commit itself. When any of these comes
/// back from [`CheckoutStore::commit_order`], no part of the checkout was
/// applied.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    /// The conditional decrement found less stock than the checkout needs.
    /// Raised at write time under the store's lock, so it is race-safe —
    /// a passing pre-check does not prevent it.
    #[error("insufficient stock for {product_name} ({product_id}): requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        product_name: String,
        requested: i64,
        available: i64,
    },

    /// A row with the same identity already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A status move outside the order lifecycle.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Unexpected storage failure (e.g. poisoned lock). Nothing was applied.
    #[error("internal storage error: {0}")]
    Internal(String),
}

/// One stock subtraction as the commit actually applied it, with the
/// resulting quantity and the row's threshold so the orchestrator can raise
/// post-commit low-stock warnings without re-reading the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedDecrement {
    pub target: StockTarget,
    pub product_name: String,
    pub descriptor: Option<String>,
    pub new_quantity: i64,
    pub minimum_stock: Option<i64>,
}

/// Result of a successful checkout commit.
#[derive(Debug, Clone)]
pub struct CommittedOrder {
    pub order: Order,
    pub applied: Vec<AppliedDecrement>,
}

/// The checkout transaction boundary.
///
/// Implementations must persist the order and apply every decrement as one
/// atomic unit: if any row cannot cover its amount (or any id is unknown),
/// nothing is written and the caller gets the typed error. Quantities never
/// go negative through this path.
pub trait CheckoutStore: Send + Sync {
    fn commit_order(
        &self,
        order: Order,
        decrements: &[StockDecrement],
    ) -> Result<CommittedOrder, StoreError>;
}

/// Read/transition access to committed orders.
///
/// The line-item snapshot is immutable: the only mutation this trait exposes
/// is the status transition, checked against the order lifecycle.
pub trait OrderStore: Send + Sync {
    fn get(&self, order_id: OrderId) -> Result<Option<Order>, StoreError>;

    fn list(&self) -> Result<Vec<Order>, StoreError>;

    /// Back-office status move; `InvariantViolation` outside the lifecycle.
    fn update_status(&self, order_id: OrderId, status: OrderStatus) -> Result<Order, StoreError>;
}

impl<S> CheckoutStore for Arc<S>
where
    S: CheckoutStore + ?Sized,
{
    fn commit_order(
        &self,
        order: Order,
        decrements: &[StockDecrement],
    ) -> Result<CommittedOrder, StoreError> {
        (**self).commit_order(order, decrements)
    }
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn get(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        (**self).get(order_id)
    }

    fn list(&self) -> Result<Vec<Order>, StoreError> {
        (**self).list()
    }

    fn update_status(&self, order_id: OrderId, status: OrderStatus) -> Result<Order, StoreError> {
        (**self).update_status(order_id, status)
    }
}
