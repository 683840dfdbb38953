use axum::Router;

pub mod checkout;
pub mod orders;
pub mod stock;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .merge(orders::router())
        .merge(checkout::router())
        .merge(stock::router())
}
