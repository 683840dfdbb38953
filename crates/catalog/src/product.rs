use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrine_core::{DomainError, DomainResult, Entity, EntityId};

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub EntityId);

impl ProductId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Category identifier (categories themselves are administered out of this core).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub EntityId);

impl CategoryId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A sellable catalog item.
///
/// `stock` is the aggregate count, used when the product has no variations;
/// products with variations track quantity per [`crate::Variation`] instead.
/// Admin CRUD creates and edits these rows; the checkout commit is the only
/// business path that decrements `stock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    /// Price in smallest currency unit (e.g., cents).
    unit_price: u64,
    stock: i64,
    minimum_stock: Option<i64>,
    category_id: CategoryId,
    created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        unit_price: u64,
        stock: i64,
        minimum_stock: Option<i64>,
        category_id: CategoryId,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if unit_price == 0 {
            return Err(DomainError::validation("unit_price must be positive"));
        }
        if stock < 0 {
            return Err(DomainError::validation("stock cannot be negative"));
        }
        if matches!(minimum_stock, Some(m) if m < 0) {
            return Err(DomainError::validation("minimum_stock cannot be negative"));
        }

        Ok(Self {
            id,
            name,
            unit_price,
            stock,
            minimum_stock,
            category_id,
            created_at,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn minimum_stock(&self) -> Option<i64> {
        self.minimum_stock
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Overwrite stock level and/or threshold (administrative path).
    ///
    /// `None` leaves the corresponding field untouched.
    pub fn set_levels(&mut self, quantity: Option<i64>, minimum: Option<i64>) -> DomainResult<()> {
        if let Some(q) = quantity {
            if q < 0 {
                return Err(DomainError::validation("stock cannot be negative"));
            }
            self.stock = q;
        }
        if let Some(m) = minimum {
            if m < 0 {
                return Err(DomainError::validation("minimum_stock cannot be negative"));
            }
            self.minimum_stock = Some(m);
        }
        Ok(())
    }

    /// Apply a checkout decrement. Callers must have verified availability;
    /// this still refuses to drive the count negative.
    pub fn decrement_stock(&mut self, amount: i64) -> DomainResult<i64> {
        if amount <= 0 {
            return Err(DomainError::validation("decrement amount must be positive"));
        }
        if self.stock < amount {
            return Err(DomainError::insufficient_stock(
                self.id.to_string(),
                self.name.clone(),
                amount,
                self.stock,
            ));
        }
        self.stock -= amount;
        Ok(self.stock)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
