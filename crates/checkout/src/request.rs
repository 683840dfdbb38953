use serde::{Deserialize, Serialize};

use vitrine_catalog::{ProductId, VariationId};
use vitrine_core::CustomerId;
use vitrine_orders::{DeliveryAddress, OrderStatus};

/// Which creation path a request came through.
///
/// The two paths share one orchestrator; this flag carries their observed
/// differences. Note the deliberately distinct initial states: back-office
/// order entry starts orders at `in_progress`, storefront checkout at
/// `pending`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    /// Back-office order entry: product id + quantity only, no delivery
    /// address, decrements aggregate product stock.
    BackOffice,
    /// Customer checkout: delivery address required, lines may target a
    /// specific variation's stock.
    Storefront,
}

impl OrderSource {
    pub fn initial_status(self) -> OrderStatus {
        match self {
            OrderSource::BackOffice => OrderStatus::InProgress,
            OrderSource::Storefront => OrderStatus::Pending,
        }
    }

    pub fn requires_address(self) -> bool {
        matches!(self, OrderSource::Storefront)
    }

    pub fn allows_variations(self) -> bool {
        matches!(self, OrderSource::Storefront)
    }
}

/// One requested cart line, as it arrives from the caller. Quantity only —
/// prices are read from the catalog at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedItem {
    pub product_id: ProductId,
    pub variation_id: Option<VariationId>,
    pub quantity: i64,
}

/// A checkout request: the cart plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub customer_id: CustomerId,
    pub items: Vec<RequestedItem>,
    pub delivery_address: Option<DeliveryAddress>,
    pub source: OrderSource,
}
