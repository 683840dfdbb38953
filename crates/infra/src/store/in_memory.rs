use std::collections::HashMap;
use std::sync::RwLock;

use vitrine_catalog::{CatalogEntry, CatalogReader, Product, ProductId, Variation, VariationId};
use vitrine_core::{DomainError, DomainResult};
use vitrine_orders::{Order, OrderId, OrderStatus};
use vitrine_stock::{StockDecrement, StockLedger, StockStatus, StockTarget};

use super::r#trait::{AppliedDecrement, CheckoutStore, CommittedOrder, OrderStore, StoreError};

#[derive(Debug, Default)]
struct State {
    products: HashMap<ProductId, Product>,
    variations: HashMap<VariationId, Variation>,
    orders: HashMap<OrderId, Order>,
}

/// In-memory transactional store: product/variation stock rows plus order
/// records behind one lock, so a checkout commit is a single critical
/// section.
///
/// Intended for tests/dev and as the reference for the commit semantics a
/// SQL backend must reproduce (`UPDATE ... SET qty = qty - :n WHERE id = :id
/// AND qty >= :n` inside the order's transaction, checking affected rows).
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DomainResult<std::sync::RwLockReadGuard<'_, State>> {
        self.inner
            .read()
            .map_err(|_| DomainError::invariant("store lock poisoned"))
    }

    fn write(&self) -> DomainResult<std::sync::RwLockWriteGuard<'_, State>> {
        self.inner
            .write()
            .map_err(|_| DomainError::invariant("store lock poisoned"))
    }

    /// Seed or replace a product row (the admin-CRUD path feeding this core).
    pub fn upsert_product(&self, product: Product) -> DomainResult<()> {
        let mut state = self.write()?;
        state.products.insert(product.id_typed(), product);
        Ok(())
    }

    /// Seed or replace a variation row. The parent product must exist first.
    pub fn upsert_variation(&self, variation: Variation) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.products.contains_key(&variation.product_id()) {
            return Err(DomainError::not_found(format!(
                "product {}",
                variation.product_id()
            )));
        }
        state.variations.insert(variation.id_typed(), variation);
        Ok(())
    }
}

impl CatalogReader for InMemoryStore {
    fn product_entry(&self, product_id: ProductId) -> DomainResult<CatalogEntry> {
        let state = self.read()?;
        let product = state
            .products
            .get(&product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))?;

        Ok(CatalogEntry {
            product_id,
            variation_id: None,
            name: product.name().to_string(),
            descriptor: None,
            unit_price: product.unit_price(),
            available: product.stock(),
            minimum_stock: product.minimum_stock(),
        })
    }

    fn variation_entry(
        &self,
        product_id: ProductId,
        variation_id: VariationId,
    ) -> DomainResult<CatalogEntry> {
        let state = self.read()?;
        let variation = state
            .variations
            .get(&variation_id)
            .filter(|v| v.product_id() == product_id)
            .ok_or_else(|| {
                DomainError::not_found(format!("variation {variation_id} of product {product_id}"))
            })?;
        let product = state
            .products
            .get(&product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))?;

        Ok(CatalogEntry {
            product_id,
            variation_id: Some(variation_id),
            name: product.name().to_string(),
            descriptor: Some(variation.descriptor()),
            unit_price: product.unit_price(),
            available: variation.quantity(),
            minimum_stock: variation.minimum_stock(),
        })
    }
}

impl StockLedger for InMemoryStore {
    fn available(&self, target: &StockTarget) -> DomainResult<i64> {
        let state = self.read()?;
        match target {
            StockTarget::Product(id) => state
                .products
                .get(id)
                .map(Product::stock)
                .ok_or_else(|| DomainError::not_found(format!("product {id}"))),
            StockTarget::Variation(id) => state
                .variations
                .get(id)
                .map(Variation::quantity)
                .ok_or_else(|| DomainError::not_found(format!("variation {id}"))),
        }
    }

    fn decrement(&self, target: &StockTarget, amount: i64) -> DomainResult<i64> {
        let mut state = self.write()?;
        match target {
            StockTarget::Product(id) => {
                let product = state
                    .products
                    .get_mut(id)
                    .ok_or_else(|| DomainError::not_found(format!("product {id}")))?;
                product.decrement_stock(amount)
            }
            StockTarget::Variation(id) => {
                let product_name = state
                    .variations
                    .get(id)
                    .and_then(|v| state.products.get(&v.product_id()))
                    .map(|p| p.name().to_string())
                    .unwrap_or_default();
                let variation = state
                    .variations
                    .get_mut(id)
                    .ok_or_else(|| DomainError::not_found(format!("variation {id}")))?;
                variation.decrement_quantity(amount, &product_name)
            }
        }
    }

    fn set_levels(
        &self,
        target: &StockTarget,
        quantity: Option<i64>,
        minimum: Option<i64>,
    ) -> DomainResult<()> {
        let mut state = self.write()?;
        match target {
            StockTarget::Product(id) => state
                .products
                .get_mut(id)
                .ok_or_else(|| DomainError::not_found(format!("product {id}")))?
                .set_levels(quantity, minimum),
            StockTarget::Variation(id) => state
                .variations
                .get_mut(id)
                .ok_or_else(|| DomainError::not_found(format!("variation {id}")))?
                .set_levels(quantity, minimum),
        }
    }

    fn snapshot(&self) -> DomainResult<Vec<StockStatus>> {
        let state = self.read()?;
        let mut statuses = Vec::with_capacity(state.products.len() + state.variations.len());

        for product in state.products.values() {
            statuses.push(StockStatus {
                target: StockTarget::Product(product.id_typed()),
                product_name: product.name().to_string(),
                descriptor: None,
                quantity: product.stock(),
                minimum_stock: product.minimum_stock(),
            });
        }
        for variation in state.variations.values() {
            let product_name = state
                .products
                .get(&variation.product_id())
                .map(|p| p.name().to_string())
                .unwrap_or_default();
            statuses.push(StockStatus {
                target: StockTarget::Variation(variation.id_typed()),
                product_name,
                descriptor: Some(variation.descriptor()),
                quantity: variation.quantity(),
                minimum_stock: variation.minimum_stock(),
            });
        }

        Ok(statuses)
    }
}

impl CheckoutStore for InMemoryStore {
    /// The checkout transaction: validate every decrement against the
    /// current rows, then apply them and insert the order — all under one
    /// write lock. Any failure returns before the first mutation, so the
    /// commit is all-or-nothing and quantities can never go negative,
    /// whatever any earlier pre-check read saw.
    fn commit_order(
        &self,
        order: Order,
        decrements: &[StockDecrement],
    ) -> Result<CommittedOrder, StoreError> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))?;

        let order_id = order.id_typed();
        if state.orders.contains_key(&order_id) {
            return Err(StoreError::Conflict(format!("order {order_id} already exists")));
        }

        // Validation pass: resolve each row once, summing duplicate targets,
        // without touching state.
        let mut working: Vec<(StockTarget, RowView, i64)> = Vec::with_capacity(decrements.len());
        for decrement in decrements {
            if decrement.quantity <= 0 {
                return Err(StoreError::Internal(format!(
                    "non-positive decrement of {} for {}",
                    decrement.quantity, decrement.target
                )));
            }

            if let Some(pos) = working.iter().position(|(t, _, _)| *t == decrement.target) {
                working[pos].2 += decrement.quantity;
            } else {
                let view = RowView::resolve(&state, &decrement.target)?;
                working.push((decrement.target, view, decrement.quantity));
            }
        }

        for (_, view, pending) in &working {
            if *pending > view.quantity {
                return Err(StoreError::InsufficientStock {
                    product_id: view.product_id.clone(),
                    product_name: view.display_name(),
                    requested: *pending,
                    available: view.quantity,
                });
            }
        }

        // Apply pass: every condition held, write the new quantities and the
        // order row.
        let mut applied = Vec::with_capacity(working.len());
        for (target, view, pending) in working {
            let new_quantity = view.quantity - pending;
            match target {
                StockTarget::Product(id) => {
                    if let Some(product) = state.products.get_mut(&id) {
                        product
                            .set_levels(Some(new_quantity), None)
                            .map_err(|e| StoreError::Internal(e.to_string()))?;
                    }
                }
                StockTarget::Variation(id) => {
                    if let Some(variation) = state.variations.get_mut(&id) {
                        variation
                            .set_levels(Some(new_quantity), None)
                            .map_err(|e| StoreError::Internal(e.to_string()))?;
                    }
                }
            }
            applied.push(AppliedDecrement {
                target,
                product_name: view.product_name,
                descriptor: view.descriptor,
                new_quantity,
                minimum_stock: view.minimum_stock,
            });
        }

        state.orders.insert(order_id, order.clone());

        Ok(CommittedOrder { order, applied })
    }
}

/// Resolved view of one stock row during commit validation.
struct RowView {
    product_id: String,
    product_name: String,
    descriptor: Option<String>,
    quantity: i64,
    minimum_stock: Option<i64>,
}

impl RowView {
    fn resolve(state: &State, target: &StockTarget) -> Result<Self, StoreError> {
        match target {
            StockTarget::Product(id) => {
                let product = state
                    .products
                    .get(id)
                    .ok_or_else(|| StoreError::NotFound(format!("product {id}")))?;
                Ok(Self {
                    product_id: id.to_string(),
                    product_name: product.name().to_string(),
                    descriptor: None,
                    quantity: product.stock(),
                    minimum_stock: product.minimum_stock(),
                })
            }
            StockTarget::Variation(id) => {
                let variation = state
                    .variations
                    .get(id)
                    .ok_or_else(|| StoreError::NotFound(format!("variation {id}")))?;
                let product_name = state
                    .products
                    .get(&variation.product_id())
                    .map(|p| p.name().to_string())
                    .unwrap_or_default();
                Ok(Self {
                    product_id: variation.product_id().to_string(),
                    product_name,
                    descriptor: Some(variation.descriptor()),
                    quantity: variation.quantity(),
                    minimum_stock: variation.minimum_stock(),
                })
            }
        }
    }

    fn display_name(&self) -> String {
        match &self.descriptor {
            Some(d) => format!("{} ({d})", self.product_name),
            None => self.product_name.clone(),
        }
    }
}

impl OrderStore for InMemoryStore {
    fn get(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        let state = self
            .inner
            .read()
            .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))?;
        Ok(state.orders.get(&order_id).cloned())
    }

    fn list(&self) -> Result<Vec<Order>, StoreError> {
        let state = self
            .inner
            .read()
            .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))?;
        let mut orders: Vec<Order> = state.orders.values().cloned().collect();
        orders.sort_by_key(|o| (o.created_at(), *o.id_typed().0.as_uuid()));
        Ok(orders)
    }

    fn update_status(&self, order_id: OrderId, status: OrderStatus) -> Result<Order, StoreError> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))?;
        let order = state
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| StoreError::NotFound(format!("order {order_id}")))?;

        order
            .transition(status)
            .map_err(|e| StoreError::InvariantViolation(e.to_string()))?;
        Ok(order.clone())
    }
}
