use serde::Serialize;
use tracing::{debug, info};

use stockroom_core::entity::find_by_id;
use stockroom_core::{Aggregate, DomainError, DomainResult, OrderId};
use stockroom_events::Event;

use crate::order::Order;

/// Command: RecordOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordOrder {
    pub order: Order,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LedgerCommand {
    RecordOrder(RecordOrder),
}

/// Event: OrderRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRecorded {
    pub order: Order,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LedgerEvent {
    OrderRecorded(OrderRecorded),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::OrderRecorded(_) => "orders.order.recorded",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}

/// Append-only history of placed orders.
///
/// Order ids are dense and start at 1: the n-th recorded order has id n.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderLedger {
    orders: Vec<Order>,
    version: u64,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next recorded order must carry. Fails once the id space is
    /// exhausted.
    pub fn next_id(&self) -> DomainResult<OrderId> {
        id_after(self.orders.len())
    }

    pub fn append(&mut self, order: Order) -> DomainResult<()> {
        let id = order.id_typed();
        self.execute(&LedgerCommand::RecordOrder(RecordOrder { order }))?;
        info!(order_id = %id, "order recorded");
        Ok(())
    }

    pub fn find_by_id(&self, id: OrderId) -> Option<&Order> {
        find_by_id(&self.orders, id)
    }

    pub fn list(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Aggregate for OrderLedger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        debug!(event = event.event_type(), "applying ledger event");
        match event {
            LedgerEvent::OrderRecorded(e) => self.orders.push(e.order.clone()),
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::RecordOrder(cmd) => self.handle_record(cmd),
        }
    }
}

fn id_after(recorded: usize) -> DomainResult<OrderId> {
    u32::try_from(recorded)
        .ok()
        .and_then(|n| n.checked_add(1))
        .map(OrderId::new)
        .ok_or_else(|| DomainError::invariant("order id space exhausted"))
}

impl OrderLedger {
    fn handle_record(&self, cmd: &RecordOrder) -> Result<Vec<LedgerEvent>, DomainError> {
        let expected = self.next_id()?;
        let actual = cmd.order.id_typed();
        if actual != expected {
            return Err(DomainError::conflict(format!(
                "order id {actual} out of sequence (expected {expected})"
            )));
        }

        Ok(vec![LedgerEvent::OrderRecorded(OrderRecorded {
            order: cmd.order.clone(),
        })])
    }
}
