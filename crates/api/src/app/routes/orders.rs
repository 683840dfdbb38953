use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use vitrine_catalog::ProductId;
use vitrine_checkout::{OrderSource, PlaceOrder, RequestedItem};
use vitrine_core::{CustomerId, EntityId};
use vitrine_orders::OrderId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().nest("/orders", orders_router())
}

fn orders_router() -> Router {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/status", post(update_order_status))
}

/// Back-office order entry: aggregate product stock, no address, and the
/// order starts out `in_progress` (the storefront checkout path starts at
/// `pending` instead — a deliberate difference between the two paths).
pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateOrderRequest>,
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
        items.push(RequestedItem {
            product_id: ProductId::new(product),
            variation_id: None,
            quantity: item.quantity,
        });
    }

    let request = PlaceOrder {
        customer_id,
        items,
        delivery_address: None,
        source: OrderSource::BackOffice,
    };

    match services.place_order(&request) {
        Ok(order) => (StatusCode::CREATED, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::checkout_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id: EntityId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };

    match services.order(OrderId::new(order_id)) {
        Ok(Some(order)) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.orders() {
        Ok(orders) => {
            let items = orders.iter().map(dto::order_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Back-office lifecycle transition. The snapshot and total are untouchable;
/// only the status moves, and only along the lifecycle.
pub async fn update_order_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateOrderStatusRequest>,
) -> axum::response::Response {
    let order_id: EntityId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };

    match services.update_order_status(OrderId::new(order_id), body.status) {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
