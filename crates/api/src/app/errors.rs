use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use vitrine_core::DomainError;
use vitrine_infra::{CheckoutError, StoreError};

pub fn checkout_error_to_response(err: CheckoutError) -> axum::response::Response {
    match err {
        CheckoutError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        CheckoutError::NotFound(what) => json_error(StatusCode::NOT_FOUND, "not_found", what),
        CheckoutError::InsufficientStock {
            product_id,
            product_name,
            requested,
            available,
        } => insufficient_stock_response(product_id, product_name, requested, available),
        CheckoutError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        CheckoutError::Internal(msg) => {
            tracing::error!(error = %msg, "checkout failed with internal error");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound(what) => json_error(StatusCode::NOT_FOUND, "not_found", what),
        StoreError::InsufficientStock {
            product_id,
            product_name,
            requested,
            available,
        } => insufficient_stock_response(product_id, product_name, requested, available),
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        StoreError::Internal(msg) => {
            tracing::error!(error = %msg, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::NotFound(what) => json_error(StatusCode::NOT_FOUND, "not_found", what),
        DomainError::InsufficientStock {
            product_id,
            product_name,
            requested,
            available,
        } => insufficient_stock_response(product_id, product_name, requested, available),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
    }
}

fn insufficient_stock_response(
    product_id: String,
    product_name: String,
    requested: i64,
    available: i64,
) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": "insufficient_stock",
            "message": format!(
                "insufficient stock for {product_name}: requested {requested}, available {available}"
            ),
            "product_id": product_id,
            "product_name": product_name,
            "requested": requested,
            "available": available,
        })),
    )
        .into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
