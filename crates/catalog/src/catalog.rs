use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use stockroom_core::entity::{find_by_id, position_by_id};
use stockroom_core::{Aggregate, DomainError, DomainResult, ProductId};
use stockroom_events::Event;

use crate::product::Product;

/// One product/quantity pair to take out of stock.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReservation {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl StockReservation {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Command: AddProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProduct {
    pub product: Product,
}

/// Command: SetQuantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetQuantity {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Command: ReserveStock.
///
/// Either every reservation is satisfiable (demand is summed per product)
/// or the command is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveStock {
    pub reservations: Vec<StockReservation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogCommand {
    AddProduct(AddProduct),
    SetQuantity(SetQuantity),
    ReserveStock(ReserveStock),
}

/// Event: ProductAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAdded {
    pub product: Product,
}

/// Event: QuantitySet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantitySet {
    pub product_id: ProductId,
    pub previous: u32,
    pub quantity: u32,
}

/// Event: StockReserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReserved {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Stock left on hand once this reservation is applied.
    pub remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogEvent {
    ProductAdded(ProductAdded),
    QuantitySet(QuantitySet),
    StockReserved(StockReserved),
}

impl Event for CatalogEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CatalogEvent::ProductAdded(_) => "catalog.product.added",
            CatalogEvent::QuantitySet(_) => "catalog.product.quantity_set",
            CatalogEvent::StockReserved(_) => "catalog.stock.reserved",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}

/// The authoritative set of tracked products, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
    version: u64,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product. Ids are unique: a second product with the same id is
    /// rejected with `Conflict`.
    pub fn add(&mut self, product: Product) -> DomainResult<()> {
        let (id, name) = (product.id_typed(), product.name().to_string());
        self.execute(&CatalogCommand::AddProduct(AddProduct { product }))?;
        info!(product_id = %id, name = %name, "product added");
        Ok(())
    }

    pub fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        find_by_id(&self.products, id)
    }

    /// Overwrites the on-hand quantity of a product.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> DomainResult<()> {
        let cmd = CatalogCommand::SetQuantity(SetQuantity {
            product_id: id,
            quantity,
        });
        match self.execute(&cmd) {
            Ok(_) => {
                info!(product_id = %id, quantity, "product quantity updated");
                Ok(())
            }
            Err(err) => {
                warn!(product_id = %id, error = %err, "quantity update rejected");
                Err(err)
            }
        }
    }

    /// Takes every reservation out of stock, or none of them.
    pub fn reserve(&mut self, reservations: Vec<StockReservation>) -> DomainResult<()> {
        self.execute(&CatalogCommand::ReserveStock(ReserveStock { reservations }))?;
        Ok(())
    }

    pub fn list(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        position_by_id(&self.products, id)
    }

    fn require(&self, id: ProductId) -> Result<&Product, DomainError> {
        self.find_by_id(id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }
}

impl Aggregate for Catalog {
    type Command = CatalogCommand;
    type Event = CatalogEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        debug!(event = event.event_type(), "applying catalog event");
        match event {
            CatalogEvent::ProductAdded(e) => {
                self.products.push(e.product.clone());
            }
            CatalogEvent::QuantitySet(e) => {
                if let Some(idx) = self.position(e.product_id) {
                    self.products[idx].set_quantity(e.quantity);
                }
            }
            CatalogEvent::StockReserved(e) => {
                if let Some(idx) = self.position(e.product_id) {
                    self.products[idx].set_quantity(e.remaining);
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CatalogCommand::AddProduct(cmd) => self.handle_add(cmd),
            CatalogCommand::SetQuantity(cmd) => self.handle_set_quantity(cmd),
            CatalogCommand::ReserveStock(cmd) => self.handle_reserve(cmd),
        }
    }
}

impl Catalog {
    fn handle_add(&self, cmd: &AddProduct) -> Result<Vec<CatalogEvent>, DomainError> {
        let id = cmd.product.id_typed();
        if self.position(id).is_some() {
            return Err(DomainError::conflict(format!("product {id} already exists")));
        }

        if cmd.product.name().trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(vec![CatalogEvent::ProductAdded(ProductAdded {
            product: cmd.product.clone(),
        })])
    }

    fn handle_set_quantity(&self, cmd: &SetQuantity) -> Result<Vec<CatalogEvent>, DomainError> {
        let product = self.require(cmd.product_id)?;

        Ok(vec![CatalogEvent::QuantitySet(QuantitySet {
            product_id: cmd.product_id,
            previous: product.quantity(),
            quantity: cmd.quantity,
        })])
    }

    fn handle_reserve(&self, cmd: &ReserveStock) -> Result<Vec<CatalogEvent>, DomainError> {
        // Demand already granted to earlier reservations in this command.
        let mut granted: HashMap<ProductId, u32> = HashMap::new();
        let mut events = Vec::with_capacity(cmd.reservations.len());

        for reservation in &cmd.reservations {
            let product = self.require(reservation.product_id)?;
            let already = granted.get(&reservation.product_id).copied().unwrap_or(0);
            let available = product.quantity() - already;

            if !product.can_fulfil(already.saturating_add(reservation.quantity)) {
                return Err(DomainError::insufficient_stock(
                    product.name(),
                    reservation.quantity,
                    available,
                ));
            }

            granted.insert(reservation.product_id, already + reservation.quantity);
            events.push(CatalogEvent::StockReserved(StockReserved {
                product_id: reservation.product_id,
                quantity: reservation.quantity,
                remaining: available - reservation.quantity,
            }));
        }

        Ok(events)
    }
}
