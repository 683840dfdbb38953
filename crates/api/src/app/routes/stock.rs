use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use vitrine_catalog::{ProductId, VariationId};
use vitrine_core::EntityId;
use vitrine_stock::StockTarget;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().nest("/stock", stock_router())
}

fn stock_router() -> Router {
    Router::new()
        .route(
            "/products/:id/levels",
            put(update_product_levels),
        )
        .route(
            "/variations/:id/levels",
            put(update_variation_levels),
        )
        .route("/products/:id", get(get_product_stock))
        .route("/variations/:id", get(get_variation_stock))
}

pub async fn update_product_levels(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateStockLevelsRequest>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<EntityId>() else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id");
    };
    set_levels(&services, StockTarget::Product(ProductId::new(id)), body)
}

pub async fn update_variation_levels(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateStockLevelsRequest>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<EntityId>() else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid variation id");
    };
    set_levels(&services, StockTarget::Variation(VariationId::new(id)), body)
}

fn set_levels(
    services: &AppServices,
    target: StockTarget,
    body: dto::UpdateStockLevelsRequest,
) -> axum::response::Response {
    match services.set_stock_levels(&target, body.quantity, body.minimum_threshold) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_product_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<EntityId>() else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id");
    };
    get_availability(&services, StockTarget::Product(ProductId::new(id)))
}

pub async fn get_variation_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<EntityId>() else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid variation id");
    };
    get_availability(&services, StockTarget::Variation(VariationId::new(id)))
}

fn get_availability(services: &AppServices, target: StockTarget) -> axum::response::Response {
    match services.available(&target) {
        Ok(quantity) => (
            StatusCode::OK,
            Json(serde_json::json!({ "available": quantity })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
