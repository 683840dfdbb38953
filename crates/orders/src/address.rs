use serde::{Deserialize, Serialize};

use vitrine_core::{DomainError, DomainResult, ValueObject};

/// Delivery address embedded in storefront orders.
///
/// All fields except `complement` are required. `number` is a string because
/// street numbers carry suffixes ("12B").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl DeliveryAddress {
    /// Check the required-when-present rule: every field except `complement`
    /// must be non-blank.
    pub fn validate(&self) -> DomainResult<()> {
        let required = [
            ("street", &self.street),
            ("number", &self.number),
            ("district", &self.district),
            ("city", &self.city),
            ("state", &self.state),
            ("postal_code", &self.postal_code),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!(
                    "delivery address {field} cannot be empty"
                )));
            }
        }
        Ok(())
    }
}

impl ValueObject for DeliveryAddress {}
