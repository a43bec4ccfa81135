//! Order placement: check every line, then commit all of them.
//!
//! Placement never mutates anything until every fallible step has passed:
//!
//! 1. each requested line is validated against a read-only view of the
//!    catalog (demand for a repeated product is summed);
//! 2. the order is built (which checks the total fits) and the ledger is
//!    asked to accept it;
//! 3. the catalog reserves all lines in one atomic command and the ledger
//!    event is applied.
//!
//! A rejected request therefore leaves catalog and ledger untouched.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use stockroom_catalog::{Catalog, StockReservation};
use stockroom_core::{Aggregate, DomainError, ProductId};

use crate::ledger::{LedgerCommand, OrderLedger, RecordOrder};
use crate::order::{Order, OrderLine};

/// One requested line: which product and how many units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl LineRequest {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Command: PlaceOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub lines: Vec<LineRequest>,
    pub placed_at: DateTime<Utc>,
}

/// Why a placement was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// A specific line could not be fulfilled. `line` is the zero-based
    /// position in the request.
    #[error("order line {} (product {}) rejected: {}", .line + 1, .product_id, .reason)]
    LineRejected {
        line: usize,
        product_id: ProductId,
        reason: DomainError,
    },

    /// The order as a whole was rejected (e.g. its total does not fit).
    #[error("order rejected: {0}")]
    Rejected(DomainError),
}

impl PlacementError {
    /// Zero-based index of the offending line, if one line is to blame.
    pub fn line(&self) -> Option<usize> {
        match self {
            PlacementError::LineRejected { line, .. } => Some(*line),
            PlacementError::Rejected(_) => None,
        }
    }

    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            PlacementError::LineRejected { product_id, .. } => Some(*product_id),
            PlacementError::Rejected(_) => None,
        }
    }

    pub fn reason(&self) -> &DomainError {
        match self {
            PlacementError::LineRejected { reason, .. } => reason,
            PlacementError::Rejected(reason) => reason,
        }
    }
}

impl From<PlacementError> for DomainError {
    fn from(err: PlacementError) -> Self {
        match err {
            PlacementError::LineRejected { reason, .. } => reason,
            PlacementError::Rejected(reason) => reason,
        }
    }
}

/// Places an order against `catalog`, recording it in `ledger`.
///
/// On success every referenced product has been decremented by exactly the
/// requested amount and the returned order is the ledger's newest entry. On
/// failure neither collection has changed.
#[instrument(skip_all, fields(lines = request.lines.len()))]
pub fn place_order(
    catalog: &mut Catalog,
    ledger: &mut OrderLedger,
    request: &PlaceOrder,
) -> Result<Order, PlacementError> {
    let result = commit(catalog, ledger, request);

    match &result {
        Ok(order) => info!(
            order_id = %order.id_typed(),
            total = %order.total_amount(),
            "order placed"
        ),
        Err(err) => warn!(error = %err, "order rejected"),
    }

    result
}

fn commit(
    catalog: &mut Catalog,
    ledger: &mut OrderLedger,
    request: &PlaceOrder,
) -> Result<Order, PlacementError> {
    let lines = validate_lines(catalog, &request.lines)?;

    let id = ledger.next_id().map_err(PlacementError::Rejected)?;
    let order = Order::new(id, lines, request.placed_at).map_err(PlacementError::Rejected)?;

    let ledger_events = ledger
        .handle(&LedgerCommand::RecordOrder(RecordOrder {
            order: order.clone(),
        }))
        .map_err(PlacementError::Rejected)?;

    let reservations = request
        .lines
        .iter()
        .map(|l| StockReservation::new(l.product_id, l.quantity))
        .collect();
    catalog
        .reserve(reservations)
        .map_err(PlacementError::Rejected)?;

    for event in &ledger_events {
        ledger.apply(event);
    }

    Ok(order)
}

/// Read-only pass: snapshot every line or report the first one that cannot
/// be fulfilled.
fn validate_lines(
    catalog: &Catalog,
    requested: &[LineRequest],
) -> Result<Vec<OrderLine>, PlacementError> {
    let mut claimed: HashMap<ProductId, u32> = HashMap::new();
    let mut lines = Vec::with_capacity(requested.len());

    for (idx, req) in requested.iter().enumerate() {
        let reject = |reason: DomainError| PlacementError::LineRejected {
            line: idx,
            product_id: req.product_id,
            reason,
        };

        let product = catalog
            .find_by_id(req.product_id)
            .ok_or_else(|| reject(DomainError::not_found(format!("product {}", req.product_id))))?;

        let already = claimed.get(&req.product_id).copied().unwrap_or(0);
        if !product.can_fulfil(already.saturating_add(req.quantity)) {
            return Err(reject(DomainError::insufficient_stock(
                product.name(),
                req.quantity,
                product.quantity() - already,
            )));
        }

        claimed.insert(req.product_id, already + req.quantity);
        lines.push(OrderLine::snapshot(product, req.quantity));
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_catalog::Product;
    use chrono::TimeZone;
    use stockroom_core::{Money, OrderId};

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn widget_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add(Product::new(ProductId::new(1), "Widget", "Tools", Money::from_cents(250), 10))
            .unwrap();
        catalog
    }

    fn request(lines: &[(u32, u32)]) -> PlaceOrder {
        PlaceOrder {
            lines: lines
                .iter()
                .map(|(id, qty)| LineRequest::new(ProductId::new(*id), *qty))
                .collect(),
            placed_at: test_time(),
        }
    }

    fn stock_of(catalog: &Catalog, id: u32) -> u32 {
        catalog.find_by_id(ProductId::new(id)).unwrap().quantity()
    }

    #[test]
    fn satisfiable_order_decrements_stock_and_records_order() {
        let mut catalog = widget_catalog();
        let mut ledger = OrderLedger::new();

        let order = place_order(&mut catalog, &mut ledger, &request(&[(1, 4)])).unwrap();

        assert_eq!(stock_of(&catalog, 1), 6);
        assert_eq!(order.total_amount(), Money::from_cents(1000));
        assert_eq!(order.id_typed(), OrderId::new(1));
        assert_eq!(order.placed_at(), test_time());
        assert_eq!(ledger.list(), &[order]);
    }

    #[test]
    fn huge_repeat_quantity_is_insufficient_stock_not_overflow() {
        let mut catalog = widget_catalog();
        let mut ledger = OrderLedger::new();

        let err = place_order(&mut catalog, &mut ledger, &request(&[(1, 4), (1, u32::MAX)]))
            .unwrap_err();

        assert_eq!(err.line(), Some(1));
        match err.reason() {
            DomainError::InsufficientStock {
                requested, available, ..
            } => {
                assert_eq!(*requested, u32::MAX);
                assert_eq!(*available, 6);
            }
            other => panic!("Expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(stock_of(&catalog, 1), 10);
        assert!(ledger.is_empty());
    }

    #[test]
    fn unknown_product_rejects_whole_order() {
        let mut catalog = widget_catalog();
        let mut ledger = OrderLedger::new();

        let err = place_order(&mut catalog, &mut ledger, &request(&[(1, 4), (99, 1)])).unwrap_err();

        assert_eq!(err.line(), Some(1));
        assert_eq!(err.product_id(), Some(ProductId::new(99)));
        assert!(err.reason().is_not_found());
        assert_eq!(stock_of(&catalog, 1), 10);
        assert!(ledger.is_empty());
    }

    #[test]
    fn insufficient_stock_rejects_and_names_product() {
        let mut catalog = widget_catalog();
        let mut ledger = OrderLedger::new();

        let err = place_order(&mut catalog, &mut ledger, &request(&[(1, 11)])).unwrap_err();

        assert_eq!(
            err,
            PlacementError::LineRejected {
                line: 0,
                product_id: ProductId::new(1),
                reason: DomainError::insufficient_stock("Widget", 11, 10),
            }
        );
        assert_eq!(
            err.to_string(),
            "order line 1 (product 1) rejected: insufficient stock for Widget: requested 11, available 10"
        );
        assert_eq!(stock_of(&catalog, 1), 10);
        assert!(ledger.is_empty());
    }

    #[test]
    fn repeated_product_demand_is_cumulative() {
        let mut catalog = widget_catalog();
        let mut ledger = OrderLedger::new();

        let err = place_order(&mut catalog, &mut ledger, &request(&[(1, 6), (1, 6)])).unwrap_err();
        assert_eq!(err.line(), Some(1));
        assert_eq!(stock_of(&catalog, 1), 10);

        let order = place_order(&mut catalog, &mut ledger, &request(&[(1, 6), (1, 4)])).unwrap();
        assert_eq!(order.lines().len(), 2);
        assert_eq!(stock_of(&catalog, 1), 0);
    }

    #[test]
    fn failed_placements_do_not_consume_order_ids() {
        let mut catalog = widget_catalog();
        let mut ledger = OrderLedger::new();

        place_order(&mut catalog, &mut ledger, &request(&[(1, 1)])).unwrap();
        place_order(&mut catalog, &mut ledger, &request(&[(42, 1)])).unwrap_err();
        let second = place_order(&mut catalog, &mut ledger, &request(&[(1, 1)])).unwrap();

        assert_eq!(second.id_typed(), OrderId::new(2));
    }

    #[test]
    fn empty_request_records_zero_total_order() {
        let mut catalog = widget_catalog();
        let mut ledger = OrderLedger::new();

        let order = place_order(&mut catalog, &mut ledger, &request(&[])).unwrap();

        assert!(order.lines().is_empty());
        assert!(order.total_amount().is_zero());
        assert_eq!(ledger.len(), 1);
        assert_eq!(stock_of(&catalog, 1), 10);
    }

    #[test]
    fn order_history_is_a_snapshot() {
        let mut catalog = widget_catalog();
        let mut ledger = OrderLedger::new();

        place_order(&mut catalog, &mut ledger, &request(&[(1, 4)])).unwrap();
        catalog.set_quantity(ProductId::new(1), 500).unwrap();

        let recorded = &ledger.list()[0];
        assert_eq!(recorded.lines()[0].quantity, 4);
        assert_eq!(recorded.total_amount(), Money::from_cents(1000));
    }

    #[test]
    fn overflowing_total_rejects_without_side_effects() {
        let mut catalog = Catalog::new();
        catalog
            .add(Product::new(ProductId::new(1), "Gold", "Bullion", Money::from_cents(u64::MAX), 5))
            .unwrap();
        let mut ledger = OrderLedger::new();

        let err = place_order(&mut catalog, &mut ledger, &request(&[(1, 2)])).unwrap_err();

        assert!(matches!(err, PlacementError::Rejected(DomainError::InvariantViolation(_))));
        assert_eq!(err.line(), None);
        assert_eq!(stock_of(&catalog, 1), 5);
        assert!(ledger.is_empty());
    }

    #[test]
    fn placement_error_converts_into_domain_error() {
        let err = PlacementError::LineRejected {
            line: 2,
            product_id: ProductId::new(9),
            reason: DomainError::not_found("product 9"),
        };
        let domain: DomainError = err.into();
        assert_eq!(domain, DomainError::not_found("product 9"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: placement is all-or-nothing and the total equals
            /// the recomputed sum of price × quantity.
            #[test]
            fn placement_is_all_or_nothing(
                stock in prop::collection::vec((0u64..10_000, 0u32..20), 1..5),
                lines in prop::collection::vec((0u32..6, 0u32..25), 0..8)
            ) {
                let mut catalog = Catalog::new();
                for (idx, (cents, qty)) in stock.iter().enumerate() {
                    catalog
                        .add(Product::new(
                            ProductId::new(idx as u32),
                            format!("p{idx}"),
                            "c",
                            Money::from_cents(*cents),
                            *qty,
                        ))
                        .unwrap();
                }
                let mut ledger = OrderLedger::new();
                let before = catalog.clone();

                match place_order(&mut catalog, &mut ledger, &request(&lines)) {
                    Ok(order) => {
                        prop_assert_eq!(ledger.len(), 1);

                        let expected: u64 = lines
                            .iter()
                            .map(|(id, qty)| {
                                let p = before.find_by_id(ProductId::new(*id)).unwrap();
                                p.price().cents() * u64::from(*qty)
                            })
                            .sum();
                        prop_assert_eq!(order.total_amount(), Money::from_cents(expected));

                        for product in before.list() {
                            let demand: u32 = lines
                                .iter()
                                .filter(|(id, _)| ProductId::new(*id) == product.id_typed())
                                .map(|(_, qty)| *qty)
                                .sum();
                            prop_assert_eq!(
                                stock_of(&catalog, product.id_typed().get()),
                                product.quantity() - demand
                            );
                        }
                    }
                    Err(_) => {
                        prop_assert_eq!(catalog.list(), before.list());
                        prop_assert!(ledger.is_empty());
                    }
                }
            }
        }
    }
}
