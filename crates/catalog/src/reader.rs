use std::sync::Arc;

use vitrine_core::DomainResult;

use crate::product::ProductId;
use crate::variation::VariationId;

/// A point-in-time catalog quote for one requested item.
///
/// Checkout planning prices and pre-checks lines from these; the price is
/// always the catalog's, never the caller's. `available` is advisory (it
/// backs the fast, descriptive pre-check error) — the authoritative stock
/// check happens at the conditional decrement inside the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub product_id: ProductId,
    pub variation_id: Option<VariationId>,
    pub name: String,
    /// Color/size label when the entry quotes a variation.
    pub descriptor: Option<String>,
    /// Unit price in smallest currency unit.
    pub unit_price: u64,
    pub available: i64,
    pub minimum_stock: Option<i64>,
}

impl CatalogEntry {
    /// Name as shown in errors and alerts: the product name, plus the
    /// color/size label when the entry quotes a variation.
    pub fn display_name(&self) -> String {
        match &self.descriptor {
            Some(d) => format!("{} ({d})", self.name),
            None => self.name.clone(),
        }
    }
}

/// Read-only catalog lookup port.
///
/// The rest of the storefront (admin CRUD, search, rendering) lives behind
/// this boundary; the checkout core only ever reads names, prices and
/// current availability through it.
pub trait CatalogReader: Send + Sync {
    /// Quote a product's aggregate entry. `NotFound` for unknown ids.
    fn product_entry(&self, product_id: ProductId) -> DomainResult<CatalogEntry>;

    /// Quote a specific variation of a product. `NotFound` if either id is
    /// unknown or the variation does not belong to the product.
    fn variation_entry(
        &self,
        product_id: ProductId,
        variation_id: VariationId,
    ) -> DomainResult<CatalogEntry>;

    /// Quote whichever entry a requested line targets.
    fn entry(
        &self,
        product_id: ProductId,
        variation_id: Option<VariationId>,
    ) -> DomainResult<CatalogEntry> {
        match variation_id {
            Some(v) => self.variation_entry(product_id, v),
            None => self.product_entry(product_id),
        }
    }
}

impl<R> CatalogReader for Arc<R>
where
    R: CatalogReader + ?Sized,
{
    fn product_entry(&self, product_id: ProductId) -> DomainResult<CatalogEntry> {
        (**self).product_entry(product_id)
    }

    fn variation_entry(
        &self,
        product_id: ProductId,
        variation_id: VariationId,
    ) -> DomainResult<CatalogEntry> {
        (**self).variation_entry(product_id, variation_id)
    }
}
