use chrono::{DateTime, Utc};

use vitrine_catalog::{CatalogEntry, CatalogReader};
use vitrine_core::{DomainError, DomainResult};
use vitrine_orders::{Order, OrderId, OrderLine};
use vitrine_stock::{StockDecrement, StockTarget};

use crate::request::{PlaceOrder, RequestedItem};

/// The validated, priced outcome of checkout planning: the order to persist
/// and the stock subtractions to apply with it, as one atomic unit.
#[derive(Debug, Clone)]
pub struct CheckoutPlan {
    pub order: Order,
    pub decrements: Vec<StockDecrement>,
}

/// Validate a request against the catalog and turn it into a [`CheckoutPlan`].
///
/// Prices come from the catalog quotes, never from the caller. Availability
/// here is the fast pre-check that produces a descriptive error before any
/// work; the conditional decrement inside the store commit re-checks
/// authoritatively, so a plan that passes can still lose the race and come
/// back as `InsufficientStock`.
///
/// Lines addressing the same stock row are summed into one decrement, so a
/// cart cannot sneak past the pre-check in slices.
pub fn plan<R>(
    reader: &R,
    order_id: OrderId,
    request: &PlaceOrder,
    now: DateTime<Utc>,
) -> DomainResult<CheckoutPlan>
where
    R: CatalogReader + ?Sized,
{
    if request.items.is_empty() {
        return Err(DomainError::validation("order must have at least one line"));
    }

    match (&request.delivery_address, request.source.requires_address()) {
        (None, true) => {
            return Err(DomainError::validation(
                "checkout requires a delivery address",
            ));
        }
        (Some(_), false) => {
            return Err(DomainError::validation(
                "back-office orders do not carry a delivery address",
            ));
        }
        _ => {}
    }

    let mut lines = Vec::with_capacity(request.items.len());
    // One entry per stock row, in first-seen order.
    let mut merged: Vec<(StockTarget, i64, CatalogEntry)> = Vec::new();

    for item in &request.items {
        let entry = resolve(reader, request, item)?;

        lines.push(OrderLine {
            product_id: item.product_id,
            variation_id: item.variation_id,
            quantity: item.quantity,
            unit_price: entry.unit_price,
        });

        let target = match item.variation_id {
            Some(v) => StockTarget::Variation(v),
            None => StockTarget::Product(item.product_id),
        };
        if let Some(pos) = merged.iter().position(|(t, _, _)| *t == target) {
            merged[pos].1 += item.quantity;
        } else {
            merged.push((target, item.quantity, entry));
        }
    }

    // Pre-check against the summed demand per stock row.
    for (_, requested, entry) in &merged {
        if *requested > entry.available {
            return Err(DomainError::insufficient_stock(
                entry.product_id.to_string(),
                entry.display_name(),
                *requested,
                entry.available,
            ));
        }
    }

    let order = Order::new(
        order_id,
        request.customer_id,
        request.source.initial_status(),
        lines,
        request.delivery_address.clone(),
        now,
    )?;

    let decrements = merged
        .into_iter()
        .map(|(target, quantity, _)| StockDecrement { target, quantity })
        .collect();

    Ok(CheckoutPlan { order, decrements })
}

fn resolve<R>(
    reader: &R,
    request: &PlaceOrder,
    item: &RequestedItem,
) -> DomainResult<CatalogEntry>
where
    R: CatalogReader + ?Sized,
{
    if item.quantity <= 0 {
        return Err(DomainError::validation("line quantity must be positive"));
    }
    if item.variation_id.is_some() && !request.source.allows_variations() {
        return Err(DomainError::validation(
            "back-office order lines target aggregate product stock",
        ));
    }
    reader.entry(item.product_id, item.variation_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    use vitrine_catalog::{ProductId, VariationId};
    use vitrine_core::{CustomerId, EntityId};
    use vitrine_orders::{DeliveryAddress, OrderStatus};

    use crate::request::OrderSource;

    #[derive(Default)]
    struct FakeCatalog {
        products: RwLock<HashMap<ProductId, CatalogEntry>>,
        variations: RwLock<HashMap<(ProductId, VariationId), CatalogEntry>>,
    }

    impl FakeCatalog {
        fn with_product(self, id: ProductId, price: u64, available: i64) -> Self {
            self.products.write().unwrap().insert(
                id,
                CatalogEntry {
                    product_id: id,
                    variation_id: None,
                    name: "Linen shirt".to_string(),
                    descriptor: None,
                    unit_price: price,
                    available,
                    minimum_stock: None,
                },
            );
            self
        }

        fn with_variation(
            self,
            product_id: ProductId,
            variation_id: VariationId,
            price: u64,
            available: i64,
        ) -> Self {
            self.variations.write().unwrap().insert(
                (product_id, variation_id),
                CatalogEntry {
                    product_id,
                    variation_id: Some(variation_id),
                    name: "Linen shirt".to_string(),
                    descriptor: Some("black / 38".to_string()),
                    unit_price: price,
                    available,
                    minimum_stock: Some(5),
                },
            );
            self
        }
    }

    impl CatalogReader for FakeCatalog {
        fn product_entry(&self, product_id: ProductId) -> DomainResult<CatalogEntry> {
            self.products
                .read()
                .unwrap()
                .get(&product_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))
        }

        fn variation_entry(
            &self,
            product_id: ProductId,
            variation_id: VariationId,
        ) -> DomainResult<CatalogEntry> {
            self.variations
                .read()
                .unwrap()
                .get(&(product_id, variation_id))
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("variation {variation_id}")))
        }
    }

    fn test_address() -> DeliveryAddress {
        DeliveryAddress {
            street: "Rua das Flores".to_string(),
            number: "120".to_string(),
            complement: None,
            district: "Centro".to_string(),
            city: "Curitiba".to_string(),
            state: "PR".to_string(),
            postal_code: "80020-000".to_string(),
        }
    }

    fn back_office_request(items: Vec<RequestedItem>) -> PlaceOrder {
        PlaceOrder {
            customer_id: CustomerId::new(),
            items,
            delivery_address: None,
            source: OrderSource::BackOffice,
        }
    }

    fn item(product_id: ProductId, quantity: i64) -> RequestedItem {
        RequestedItem {
            product_id,
            variation_id: None,
            quantity,
        }
    }

    #[test]
    fn prices_and_totals_come_from_the_catalog() {
        // Scenario: stock 10, price 5.00; two units → total 10.00, one
        // decrement of 2 against the product row.
        let product = ProductId::new(EntityId::new());
        let catalog = FakeCatalog::default().with_product(product, 500, 10);

        let request = back_office_request(vec![item(product, 2)]);
        let plan = plan(&catalog, OrderId::new(EntityId::new()), &request, Utc::now()).unwrap();

        assert_eq!(plan.order.total(), 1000);
        assert_eq!(plan.order.status(), OrderStatus::InProgress);
        assert_eq!(
            plan.decrements,
            vec![StockDecrement {
                target: StockTarget::Product(product),
                quantity: 2,
            }]
        );
    }

    #[test]
    fn shortfall_reports_requested_and_available() {
        let product = ProductId::new(EntityId::new());
        let catalog = FakeCatalog::default().with_product(product, 500, 1);

        let request = back_office_request(vec![item(product, 2)]);
        let err = plan(&catalog, OrderId::new(EntityId::new()), &request, Utc::now()).unwrap_err();

        match err {
            DomainError::InsufficientStock {
                requested,
                available,
                product_name,
                ..
            } => {
                assert_eq!(requested, 2);
                assert_eq!(available, 1);
                assert_eq!(product_name, "Linen shirt");
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn unknown_product_is_not_found() {
        let catalog = FakeCatalog::default();
        let request = back_office_request(vec![item(ProductId::new(EntityId::new()), 1)]);

        let err = plan(&catalog, OrderId::new(EntityId::new()), &request, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn duplicate_lines_are_checked_as_one_demand() {
        // 2 + 2 against stock 3 must fail as a whole, not line by line.
        let product = ProductId::new(EntityId::new());
        let catalog = FakeCatalog::default().with_product(product, 500, 3);

        let request = back_office_request(vec![item(product, 2), item(product, 2)]);
        let err = plan(&catalog, OrderId::new(EntityId::new()), &request, Utc::now()).unwrap_err();

        match err {
            DomainError::InsufficientStock {
                requested,
                available,
                ..
            } => {
                assert_eq!(requested, 4);
                assert_eq!(available, 3);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn storefront_requires_an_address() {
        let product = ProductId::new(EntityId::new());
        let catalog = FakeCatalog::default().with_product(product, 500, 10);

        let request = PlaceOrder {
            customer_id: CustomerId::new(),
            items: vec![item(product, 1)],
            delivery_address: None,
            source: OrderSource::Storefront,
        };
        let err = plan(&catalog, OrderId::new(EntityId::new()), &request, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn storefront_line_can_target_a_variation() {
        let product = ProductId::new(EntityId::new());
        let variation = VariationId::new(EntityId::new());
        let catalog = FakeCatalog::default()
            .with_product(product, 500, 0)
            .with_variation(product, variation, 700, 6);

        let request = PlaceOrder {
            customer_id: CustomerId::new(),
            items: vec![RequestedItem {
                product_id: product,
                variation_id: Some(variation),
                quantity: 2,
            }],
            delivery_address: Some(test_address()),
            source: OrderSource::Storefront,
        };

        let plan = plan(&catalog, OrderId::new(EntityId::new()), &request, Utc::now()).unwrap();
        assert_eq!(plan.order.status(), OrderStatus::Pending);
        assert_eq!(plan.order.total(), 1400);
        assert_eq!(
            plan.decrements,
            vec![StockDecrement {
                target: StockTarget::Variation(variation),
                quantity: 2,
            }]
        );
        assert!(plan.order.delivery_address().is_some());
    }

    #[test]
    fn back_office_lines_cannot_target_variations() {
        let product = ProductId::new(EntityId::new());
        let variation = VariationId::new(EntityId::new());
        let catalog = FakeCatalog::default()
            .with_product(product, 500, 10)
            .with_variation(product, variation, 700, 6);

        let request = back_office_request(vec![RequestedItem {
            product_id: product,
            variation_id: Some(variation),
            quantity: 1,
        }]);
        let err = plan(&catalog, OrderId::new(EntityId::new()), &request, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn non_positive_quantity_is_rejected_before_lookup() {
        let catalog = FakeCatalog::default();
        let request = back_office_request(vec![item(ProductId::new(EntityId::new()), 0)]);

        let err = plan(&catalog, OrderId::new(EntityId::new()), &request, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                // Use deterministic seed for CI reproducibility
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a plan never schedules more than the quoted
            /// availability for any stock row, and its order total always
            /// matches the catalog price times the requested quantities.
            #[test]
            fn plans_never_exceed_availability(
                available in 0i64..50,
                price in 1u64..10_000,
                quantities in prop::collection::vec(1i64..10, 1..5)
            ) {
                let product = ProductId::new(EntityId::new());
                let catalog = FakeCatalog::default().with_product(product, price, available);

                let items: Vec<RequestedItem> =
                    quantities.iter().map(|&q| item(product, q)).collect();
                let total_requested: i64 = quantities.iter().sum();

                let result = plan(
                    &catalog,
                    OrderId::new(EntityId::new()),
                    &back_office_request(items),
                    Utc::now(),
                );

                if total_requested <= available {
                    let plan = result.unwrap();
                    prop_assert_eq!(plan.decrements.len(), 1);
                    prop_assert_eq!(plan.decrements[0].quantity, total_requested);
                    prop_assert_eq!(
                        plan.order.total(),
                        price * total_requested as u64
                    );
                } else {
                    let is_insufficient = matches!(
                        result.unwrap_err(),
                        DomainError::InsufficientStock { .. }
                    );
                    prop_assert!(is_insufficient);
                }
            }
        }
    }
}
