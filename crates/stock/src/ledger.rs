use std::sync::Arc;

use serde::{Deserialize, Serialize};

use vitrine_catalog::{ProductId, VariationId};
use vitrine_core::DomainResult;

/// The stock row an operation addresses: a product's aggregate count or a
/// specific variation's count.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockTarget {
    Product(ProductId),
    Variation(VariationId),
}

impl core::fmt::Display for StockTarget {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StockTarget::Product(id) => write!(f, "product {id}"),
            StockTarget::Variation(id) => write!(f, "variation {id}"),
        }
    }
}

/// One planned stock subtraction inside a checkout commit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StockDecrement {
    pub target: StockTarget,
    pub quantity: i64,
}

/// Point-in-time view of one stock row, as the monitor sweeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockStatus {
    pub target: StockTarget,
    pub product_name: String,
    /// Color/size label when the row is a variation.
    pub descriptor: Option<String>,
    pub quantity: i64,
    pub minimum_stock: Option<i64>,
}

/// The stock ledger: the only writer of quantity columns.
///
/// Reads are lock-free from the caller's perspective and only advisory;
/// every mutation goes through `decrement`/`set_levels` so the non-negative
/// invariant cannot be bypassed. `decrement` is the authoritative,
/// race-safe availability check: it succeeds only if the current quantity
/// covers the amount at write time, regardless of what any earlier read
/// returned.
pub trait StockLedger: Send + Sync {
    /// Point-in-time availability. `NotFound` for unknown ids.
    fn available(&self, target: &StockTarget) -> DomainResult<i64>;

    /// Conditional decrement: succeeds only if `current ≥ amount`, returning
    /// the new quantity. `NotFound` / `InsufficientStock` otherwise.
    fn decrement(&self, target: &StockTarget, amount: i64) -> DomainResult<i64>;

    /// Administrative override of quantity and/or threshold. `None` leaves a
    /// field untouched.
    fn set_levels(
        &self,
        target: &StockTarget,
        quantity: Option<i64>,
        minimum: Option<i64>,
    ) -> DomainResult<()>;

    /// Full read of every stock row (monitor sweep input).
    fn snapshot(&self) -> DomainResult<Vec<StockStatus>>;
}

impl<L> StockLedger for Arc<L>
where
    L: StockLedger + ?Sized,
{
    fn available(&self, target: &StockTarget) -> DomainResult<i64> {
        (**self).available(target)
    }

    fn decrement(&self, target: &StockTarget, amount: i64) -> DomainResult<i64> {
        (**self).decrement(target, amount)
    }

    fn set_levels(
        &self,
        target: &StockTarget,
        quantity: Option<i64>,
        minimum: Option<i64>,
    ) -> DomainResult<()> {
        (**self).set_levels(target, quantity, minimum)
    }

    fn snapshot(&self) -> DomainResult<Vec<StockStatus>> {
        (**self).snapshot()
    }
}
