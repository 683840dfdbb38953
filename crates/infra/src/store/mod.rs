//! Transactional storage boundary.
//!
//! This module defines the infrastructure-facing abstraction for the order
//! ledger and the checkout commit, without making storage assumptions. The
//! stock ledger surface itself is the domain-level [`vitrine_stock::StockLedger`]
//! trait; implementations here provide it alongside the commit.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use r#trait::{AppliedDecrement, CheckoutStore, CommittedOrder, OrderStore, StoreError};
