//! `vitrine-orders` — the order ledger's domain model: committed orders,
//! their immutable line-item snapshots, and the status lifecycle.

pub mod address;
pub mod order;

pub use address::DeliveryAddress;
pub use order::{
    LineItemSnapshot, Order, OrderId, OrderLine, OrderStatus, LINE_ITEM_SCHEMA_VERSION,
};
