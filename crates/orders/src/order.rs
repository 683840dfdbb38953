use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrine_catalog::{ProductId, VariationId};
use vitrine_core::{CustomerId, DomainError, DomainResult, Entity, EntityId};

use crate::address::DeliveryAddress;

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub EntityId);

impl OrderId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order status lifecycle.
///
/// Forward path: `Pending`/`InProgress` → `Processing` → `Shipped` →
/// `Delivered`. `Cancelled` is reachable from any state prior to delivery.
/// `Delivered` and `Cancelled` are terminal. Checkout assigns the initial
/// state; everything after that is a back-office transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, to) {
            (Pending | InProgress, Processing) => true,
            (Processing, Shipped) => true,
            (Shipped, Delivered) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// One line of an order: a quantity of a product (or one of its variations)
/// at the unit price read from the catalog at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub variation_id: Option<VariationId>,
    pub quantity: i64,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
}

impl OrderLine {
    /// `unit_price × quantity`, checked. `None` on overflow.
    pub fn line_total(&self) -> Option<u64> {
        u64::try_from(self.quantity)
            .ok()
            .and_then(|q| self.unit_price.checked_mul(q))
    }
}

/// Schema tag written into every persisted line-item snapshot.
///
/// Bump when the `OrderLine` shape changes so historical orders stay
/// parseable against the version they were written with.
pub const LINE_ITEM_SCHEMA_VERSION: u32 = 1;

/// Versioned, strongly-typed line-item list embedded in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemSnapshot {
    pub schema_version: u32,
    pub lines: Vec<OrderLine>,
}

impl LineItemSnapshot {
    pub fn new(lines: Vec<OrderLine>) -> Self {
        Self {
            schema_version: LINE_ITEM_SCHEMA_VERSION,
            lines,
        }
    }
}

/// A committed customer order.
///
/// The line-item snapshot and total are fixed at creation; later catalog or
/// price changes never touch a historical order. Only `status` moves after
/// creation, through [`Order::transition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    status: OrderStatus,
    /// Total in smallest currency unit; always `Σ(unit_price × quantity)`.
    total: u64,
    delivery_address: Option<DeliveryAddress>,
    items: LineItemSnapshot,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Build a new order from priced lines.
    ///
    /// The total is computed here, never accepted from the caller, so the
    /// total/lines invariant holds by construction. `initial_status` must be
    /// one of the two states checkout is allowed to assign.
    pub fn new(
        id: OrderId,
        customer_id: CustomerId,
        initial_status: OrderStatus,
        lines: Vec<OrderLine>,
        delivery_address: Option<DeliveryAddress>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if !matches!(initial_status, OrderStatus::Pending | OrderStatus::InProgress) {
            return Err(DomainError::invariant(
                "orders are created as pending or in_progress",
            ));
        }
        if lines.is_empty() {
            return Err(DomainError::validation("order must have at least one line"));
        }
        if let Some(addr) = &delivery_address {
            addr.validate()?;
        }

        let total = Self::compute_total(&lines)?;

        Ok(Self {
            id,
            customer_id,
            status: initial_status,
            total,
            delivery_address,
            items: LineItemSnapshot::new(lines),
            created_at,
        })
    }

    fn compute_total(lines: &[OrderLine]) -> DomainResult<u64> {
        let mut total: u64 = 0;
        for line in lines {
            if line.quantity <= 0 {
                return Err(DomainError::validation("line quantity must be positive"));
            }
            if line.unit_price == 0 {
                return Err(DomainError::validation("line unit_price must be positive"));
            }
            let line_total = line
                .line_total()
                .ok_or_else(|| DomainError::validation("order total overflows"))?;
            total = total
                .checked_add(line_total)
                .ok_or_else(|| DomainError::validation("order total overflows"))?;
        }
        Ok(total)
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn delivery_address(&self) -> Option<&DeliveryAddress> {
        self.delivery_address.as_ref()
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.items.lines
    }

    pub fn snapshot(&self) -> &LineItemSnapshot {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Move the order to a new status, enforcing the lifecycle.
    pub fn transition(&mut self, to: OrderStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(DomainError::invariant(format!(
                "cannot transition order from {:?} to {:?}",
                self.status, to
            )));
        }
        self.status = to;
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_order_id() -> OrderId {
        OrderId::new(EntityId::new())
    }

    fn test_line(quantity: i64, unit_price: u64) -> OrderLine {
        OrderLine {
            product_id: ProductId::new(EntityId::new()),
            variation_id: None,
            quantity,
            unit_price,
        }
    }

    fn test_order(lines: Vec<OrderLine>) -> DomainResult<Order> {
        Order::new(
            test_order_id(),
            CustomerId::new(),
            OrderStatus::Pending,
            lines,
            None,
            Utc::now(),
        )
    }

    #[test]
    fn total_is_sum_of_line_totals() {
        let order = test_order(vec![test_line(2, 500), test_line(3, 125)]).unwrap();
        assert_eq!(order.total(), 2 * 500 + 3 * 125);
    }

    #[test]
    fn empty_order_is_rejected() {
        assert!(test_order(vec![]).is_err());
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        assert!(test_order(vec![test_line(0, 500)]).is_err());
        assert!(test_order(vec![test_line(-1, 500)]).is_err());
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let err = test_order(vec![test_line(i64::MAX, u64::MAX)]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn only_checkout_states_allowed_at_creation() {
        let err = Order::new(
            test_order_id(),
            CustomerId::new(),
            OrderStatus::Shipped,
            vec![test_line(1, 100)],
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn lifecycle_happy_path() {
        let mut order = test_order(vec![test_line(1, 100)]).unwrap();
        order.transition(OrderStatus::Processing).unwrap();
        order.transition(OrderStatus::Shipped).unwrap();
        order.transition(OrderStatus::Delivered).unwrap();
        assert!(order.status().is_terminal());
    }

    #[test]
    fn cancel_allowed_until_delivered() {
        let mut order = test_order(vec![test_line(1, 100)]).unwrap();
        order.transition(OrderStatus::Processing).unwrap();
        order.transition(OrderStatus::Cancelled).unwrap();

        let mut delivered = test_order(vec![test_line(1, 100)]).unwrap();
        delivered.transition(OrderStatus::Processing).unwrap();
        delivered.transition(OrderStatus::Shipped).unwrap();
        delivered.transition(OrderStatus::Delivered).unwrap();
        assert!(delivered.transition(OrderStatus::Cancelled).is_err());
    }

    #[test]
    fn skipping_forward_states_is_rejected() {
        let mut order = test_order(vec![test_line(1, 100)]).unwrap();
        let err = order.transition(OrderStatus::Shipped).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn transition_leaves_snapshot_untouched() {
        let mut order = test_order(vec![test_line(2, 500)]).unwrap();
        let before = order.snapshot().clone();
        let total_before = order.total();

        order.transition(OrderStatus::Processing).unwrap();

        assert_eq!(order.snapshot(), &before);
        assert_eq!(order.total(), total_before);
    }

    #[test]
    fn snapshot_carries_schema_version_tag() {
        let order = test_order(vec![test_line(1, 100)]).unwrap();
        assert_eq!(order.snapshot().schema_version, LINE_ITEM_SCHEMA_VERSION);

        // The persisted shape is tagged, not a loose array.
        let json = serde_json::to_value(order.snapshot()).unwrap();
        assert_eq!(json["schema_version"], 1);
        assert!(json["lines"].is_array());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                // Use deterministic seed for CI reproducibility
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: for every constructible order,
            /// total == Σ(unit_price × quantity).
            #[test]
            fn total_matches_lines(
                inputs in prop::collection::vec((1i64..1_000, 1u64..100_000), 1..8)
            ) {
                let lines: Vec<OrderLine> = inputs
                    .iter()
                    .map(|&(quantity, unit_price)| test_line(quantity, unit_price))
                    .collect();

                let order = test_order(lines.clone()).unwrap();

                let expected: u64 = lines
                    .iter()
                    .map(|l| l.unit_price * l.quantity as u64)
                    .sum();
                prop_assert_eq!(order.total(), expected);
                prop_assert_eq!(order.lines(), lines.as_slice());
            }
        }
    }
}
