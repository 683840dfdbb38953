use serde::Deserialize;
use serde_json::json;

use vitrine_orders::{DeliveryAddress, Order, OrderStatus};

// -------------------------
// Request DTOs
// -------------------------

/// Back-office order entry: product + quantity only, aggregate stock.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub items: Vec<BackOfficeItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct BackOfficeItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// Customer checkout: address required, lines may target a variation.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer_id: String,
    pub items: Vec<CheckoutItemRequest>,
    pub delivery_address: AddressRequest,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutItemRequest {
    pub product_id: String,
    pub variation_id: Option<String>,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl From<AddressRequest> for DeliveryAddress {
    fn from(value: AddressRequest) -> Self {
        DeliveryAddress {
            street: value.street,
            number: value.number,
            complement: value.complement,
            district: value.district,
            city: value.city,
            state: value.state,
            postal_code: value.postal_code,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStockLevelsRequest {
    pub quantity: Option<i64>,
    pub minimum_threshold: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

// -------------------------
// Response mapping
// -------------------------

pub fn order_to_json(order: &Order) -> serde_json::Value {
    json!({
        "id": order.id_typed().to_string(),
        "customer_id": order.customer_id().to_string(),
        "status": order.status(),
        "total": order.total(),
        "items": order.snapshot(),
        "delivery_address": order.delivery_address(),
        "created_at": order.created_at(),
    })
}
