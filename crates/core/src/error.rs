//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, stock shortfalls). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced product, variation or order does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Requested quantity exceeds what the stock ledger can satisfy.
    ///
    /// Carries enough detail for the caller to adjust the cart; raised by the
    /// checkout pre-check and by the authoritative conditional decrement.
    #[error("insufficient stock for {product_name} ({product_id}): requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        product_name: String,
        requested: i64,
        available: i64,
    },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn insufficient_stock(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        requested: i64,
        available: i64,
    ) -> Self {
        Self::InsufficientStock {
            product_id: product_id.into(),
            product_name: product_name.into(),
            requested,
            available,
        }
    }
}
