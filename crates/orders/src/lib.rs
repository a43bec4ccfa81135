//! Orders domain module.
//!
//! Holds the order ledger and the all-or-nothing order placement that
//! reserves catalog stock and records a new order.

pub mod ledger;
pub mod order;
pub mod placement;

pub use ledger::{LedgerCommand, LedgerEvent, OrderLedger, OrderRecorded, RecordOrder};
pub use order::{Order, OrderLine};
pub use placement::{LineRequest, PlaceOrder, PlacementError, place_order};
