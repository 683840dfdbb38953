use serde::{Deserialize, Serialize};

use vitrine_core::{DomainError, DomainResult, Entity, EntityId};

use crate::product::ProductId;

/// Variation identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariationId(pub EntityId);

impl VariationId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for VariationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A concrete color/size instance of a product with its own stock count and
/// its own low-stock threshold.
///
/// `quantity` is mutated only through the stock ledger's conditional
/// decrement and the administrative `set_levels` path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    id: VariationId,
    product_id: ProductId,
    color: String,
    size_number: Option<u32>,
    quantity: i64,
    minimum_stock: Option<i64>,
    /// Acquisition cost in smallest currency unit, when tracked.
    purchase_cost: Option<u64>,
}

impl Variation {
    pub fn new(
        id: VariationId,
        product_id: ProductId,
        color: impl Into<String>,
        size_number: Option<u32>,
        quantity: i64,
        minimum_stock: Option<i64>,
        purchase_cost: Option<u64>,
    ) -> DomainResult<Self> {
        let color = color.into();
        if color.trim().is_empty() {
            return Err(DomainError::validation("variation color cannot be empty"));
        }
        if quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        if matches!(minimum_stock, Some(m) if m < 0) {
            return Err(DomainError::validation("minimum_stock cannot be negative"));
        }

        Ok(Self {
            id,
            product_id,
            color,
            size_number,
            quantity,
            minimum_stock,
            purchase_cost,
        })
    }

    pub fn id_typed(&self) -> VariationId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn size_number(&self) -> Option<u32> {
        self.size_number
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn minimum_stock(&self) -> Option<i64> {
        self.minimum_stock
    }

    pub fn purchase_cost(&self) -> Option<u64> {
        self.purchase_cost
    }

    /// Human-readable color/size label used in low-stock alerts.
    pub fn descriptor(&self) -> String {
        match self.size_number {
            Some(n) => format!("{} / {}", self.color, n),
            None => self.color.clone(),
        }
    }

    /// Overwrite quantity and/or threshold (administrative path).
    pub fn set_levels(&mut self, quantity: Option<i64>, minimum: Option<i64>) -> DomainResult<()> {
        if let Some(q) = quantity {
            if q < 0 {
                return Err(DomainError::validation("quantity cannot be negative"));
            }
            self.quantity = q;
        }
        if let Some(m) = minimum {
            if m < 0 {
                return Err(DomainError::validation("minimum_stock cannot be negative"));
            }
            self.minimum_stock = Some(m);
        }
        Ok(())
    }

    /// Apply a checkout decrement; refuses to drive the count negative.
    ///
    /// `product_name` is only used to build a descriptive error.
    pub fn decrement_quantity(&mut self, amount: i64, product_name: &str) -> DomainResult<i64> {
        if amount <= 0 {
            return Err(DomainError::validation("decrement amount must be positive"));
        }
        if self.quantity < amount {
            return Err(DomainError::insufficient_stock(
                self.product_id.to_string(),
                format!("{product_name} ({})", self.descriptor()),
                amount,
                self.quantity,
            ));
        }
        self.quantity -= amount;
        Ok(self.quantity)
    }
}

impl Entity for Variation {
    type Id = VariationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
