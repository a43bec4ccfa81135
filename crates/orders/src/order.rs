use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_catalog::Product;
use stockroom_core::{DomainError, DomainResult, Entity, Money, OrderId, ProductId};

/// Order line: a snapshot of the product as it was when the order was
/// placed, plus the quantity ordered.
///
/// Later catalog changes never show up in order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    /// Price per unit at the time of ordering.
    pub unit_price: Money,
    pub quantity: u32,
}

impl OrderLine {
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id_typed(),
            name: product.name().to_string(),
            category: product.category().to_string(),
            unit_price: product.price(),
            quantity,
        }
    }

    /// `unit_price × quantity`, or `None` if it does not fit.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

impl core::fmt::Display for OrderLine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | Quantity: {}",
            self.product_id, self.name, self.category, self.unit_price, self.quantity
        )
    }
}

/// A placed order. Created once, never mutated.
///
/// The total is computed from the lines at construction and cannot be set
/// independently, so it always equals the sum of `line_total()`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    id: OrderId,
    lines: Vec<OrderLine>,
    total_amount: Money,
    placed_at: DateTime<Utc>,
}

impl Order {
    pub fn new(id: OrderId, lines: Vec<OrderLine>, placed_at: DateTime<Utc>) -> DomainResult<Self> {
        let total_amount = Self::compute_total(&lines)?;
        Ok(Self {
            id,
            lines,
            total_amount,
            placed_at,
        })
    }

    fn compute_total(lines: &[OrderLine]) -> DomainResult<Money> {
        let line_totals: Option<Vec<Money>> = lines.iter().map(OrderLine::line_total).collect();
        line_totals
            .and_then(Money::checked_sum)
            .ok_or_else(|| DomainError::invariant("order total exceeds the representable amount"))
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }
}

impl core::fmt::Display for Order {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Order ID: {}", self.id)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        write!(f, "Total: {}", self.total_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: u32, cents: u64, quantity: u32) -> OrderLine {
        OrderLine {
            product_id: ProductId::new(id),
            name: format!("p{id}"),
            category: "c".to_string(),
            unit_price: Money::from_cents(cents),
            quantity,
        }
    }

    #[test]
    fn total_is_sum_of_line_totals() {
        let order = Order::new(
            OrderId::new(1),
            vec![line(1, 250, 4), line(2, 1999, 2)],
            Utc::now(),
        )
        .unwrap();
        assert_eq!(order.total_amount(), Money::from_cents(1000 + 3998));
    }

    #[test]
    fn empty_order_totals_zero() {
        let order = Order::new(OrderId::new(1), Vec::new(), Utc::now()).unwrap();
        assert!(order.total_amount().is_zero());
        assert!(order.lines().is_empty());
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let err = Order::new(OrderId::new(1), vec![line(1, u64::MAX, 2)], Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        let err = Order::new(
            OrderId::new(1),
            vec![line(1, u64::MAX, 1), line(2, 1, 1)],
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn snapshot_is_detached_from_product() {
        let product = Product::new(ProductId::new(1), "Widget", "Tools", Money::from_cents(250), 10);
        let snapshot = OrderLine::snapshot(&product, 4);
        drop(product);

        assert_eq!(snapshot.name, "Widget");
        assert_eq!(snapshot.quantity, 4);
        assert_eq!(snapshot.line_total(), Some(Money::from_cents(1000)));
    }

    #[test]
    fn display_lists_lines_and_total() {
        let order = Order::new(OrderId::new(3), vec![line(1, 250, 4)], Utc::now()).unwrap();
        assert_eq!(
            order.to_string(),
            "Order ID: 3\n1 | p1 | c | $2.50 | Quantity: 4\nTotal: $10.00"
        );
    }
}
