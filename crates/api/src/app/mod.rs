//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: infrastructure wiring (store, orchestrator, monitor)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP app with production wiring (public entrypoint used by
/// `main.rs`): in-memory store, tracing alert sink, hourly low-stock monitor.
pub async fn build_app() -> Router {
    let services = Arc::new(services::AppServices::new(
        vitrine_infra::LowStockRunner::default(),
    ));
    build_router(services)
}

/// Assemble the router around pre-built services (tests seed the store and
/// pick their own monitor config before calling this).
pub fn build_router(services: Arc<services::AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(ServiceBuilder::new())
}
