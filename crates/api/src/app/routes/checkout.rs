use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use vitrine_catalog::{ProductId, VariationId};
use vitrine_checkout::{OrderSource, PlaceOrder, RequestedItem};
use vitrine_core::{CustomerId, EntityId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/checkout", post(checkout))
}

/// Customer-facing checkout: delivery address required, lines may target a
/// specific variation's stock, and the order starts out `pending`.
pub async fn checkout(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CheckoutRequest>,
) -> axum::response::Response {
    let customer_id: CustomerId = match body.customer_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id")
        }
    };

    let mut items = Vec::with_capacity(body.items.len());
    for item in body.items {
        let product: EntityId = match item.product_id.parse() {
            Ok(v) => v,
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_id",
                    "invalid product id",
                )
            }
        };
        let variation_id = match item.variation_id.as_deref() {
            Some(raw) => match raw.parse::<EntityId>() {
                Ok(v) => Some(VariationId::new(v)),
                Err(_) => {
                    return errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "invalid_id",
                        "invalid variation id",
                    )
                }
            },
            None => None,
        };
        items.push(RequestedItem {
            product_id: ProductId::new(product),
            variation_id,
            quantity: item.quantity,
        });
    }

    let request = PlaceOrder {
        customer_id,
        items,
        delivery_address: Some(body.delivery_address.into()),
        source: OrderSource::Storefront,
    };

    match services.place_order(&request) {
        Ok(order) => (StatusCode::CREATED, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::checkout_error_to_response(e),
    }
}
