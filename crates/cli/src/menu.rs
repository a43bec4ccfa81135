//! The numbered console menu.

use core::str::FromStr;
use std::io::{BufRead, Write};

use chrono::Utc;
use tracing::debug;

use stockroom_catalog::{Catalog, Product};
use stockroom_core::{DomainError, Money, ProductId, SupplierId};
use stockroom_orders::{LineRequest, OrderLedger, PlaceOrder, place_order};
use stockroom_suppliers::{Supplier, SupplierDirectory};

use crate::config::OutputFormat;
use crate::prompt::Prompter;
use crate::render;

const BANNER: &str = "\n=== Inventory Management System ===\n\
1. Add Product\n\
2. Update Product Quantity\n\
3. Display Products\n\
4. Add Supplier\n\
5. Display Suppliers\n\
6. Place Order\n\
7. Display Orders\n\
8. Exit";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    AddProduct,
    UpdateQuantity,
    ListProducts,
    AddSupplier,
    ListSuppliers,
    PlaceOrder,
    ListOrders,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::AddProduct),
            "2" => Ok(MenuChoice::UpdateQuantity),
            "3" => Ok(MenuChoice::ListProducts),
            "4" => Ok(MenuChoice::AddSupplier),
            "5" => Ok(MenuChoice::ListSuppliers),
            "6" => Ok(MenuChoice::PlaceOrder),
            "7" => Ok(MenuChoice::ListOrders),
            "8" => Ok(MenuChoice::Exit),
            other => Err(DomainError::validation(format!("no menu entry {other:?}"))),
        }
    }
}

/// Everything the tracker knows, owned by the front end and lent to the
/// domain operations.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub catalog: Catalog,
    pub suppliers: SupplierDirectory,
    pub ledger: OrderLedger,
}

enum Flow {
    Continue,
    Exit,
}

pub struct Menu<R, W> {
    prompter: Prompter<R, W>,
    inventory: Inventory,
    output: OutputFormat,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, format: OutputFormat) -> Self {
        Self::with_inventory(input, output, format, Inventory::default())
    }

    pub fn with_inventory(input: R, output: W, format: OutputFormat, inventory: Inventory) -> Self {
        Self {
            prompter: Prompter::new(input, output),
            inventory,
            output: format,
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn into_parts(self) -> (Inventory, W) {
        (self.inventory, self.prompter.into_output())
    }

    /// Runs until the user picks Exit or the input ends.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.prompter.say(BANNER)?;
            let Some(raw) = self.prompter.text("Enter your choice: ")? else {
                break;
            };

            let choice = match raw.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(_) => {
                    self.prompter.say("Invalid choice. Please try again.")?;
                    continue;
                }
            };
            debug!(?choice, "menu choice");

            if let Flow::Exit = self.dispatch(choice)? {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> anyhow::Result<Flow> {
        match choice {
            MenuChoice::AddProduct => self.add_product(),
            MenuChoice::UpdateQuantity => self.update_quantity(),
            MenuChoice::ListProducts => {
                let out = self.prompter.output();
                render::listing(out, self.inventory.catalog.list(), self.output, "No products.")?;
                Ok(Flow::Continue)
            }
            MenuChoice::AddSupplier => self.add_supplier(),
            MenuChoice::ListSuppliers => {
                let out = self.prompter.output();
                render::listing(out, self.inventory.suppliers.list(), self.output, "No suppliers.")?;
                Ok(Flow::Continue)
            }
            MenuChoice::PlaceOrder => self.place_order(),
            MenuChoice::ListOrders => {
                let out = self.prompter.output();
                render::listing(out, self.inventory.ledger.list(), self.output, "No orders.")?;
                Ok(Flow::Continue)
            }
            MenuChoice::Exit => {
                self.prompter.say("Exiting system...")?;
                Ok(Flow::Exit)
            }
        }
    }

    fn add_product(&mut self) -> anyhow::Result<Flow> {
        let p = &mut self.prompter;
        let Some(id) = p.parsed::<ProductId>("Enter Product ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(name) = p.text("Enter Product Name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(category) = p.text("Enter Category: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(price) = p.parsed::<Money>("Enter Price: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(quantity) = p.parsed::<u32>("Enter Quantity: ")? else {
            return Ok(Flow::Exit);
        };

        let product = Product::new(id, name, category, price, quantity);
        let result = self.inventory.catalog.add(product);
        self.report(result, "Product added.")
    }

    fn update_quantity(&mut self) -> anyhow::Result<Flow> {
        let p = &mut self.prompter;
        let Some(id) = p.parsed::<ProductId>("Enter Product ID to update quantity: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(quantity) = p.parsed::<u32>("Enter new quantity: ")? else {
            return Ok(Flow::Exit);
        };

        let result = self.inventory.catalog.set_quantity(id, quantity);
        self.report(result, "Quantity updated.")
    }

    fn add_supplier(&mut self) -> anyhow::Result<Flow> {
        let p = &mut self.prompter;
        let Some(id) = p.parsed::<SupplierId>("Enter Supplier ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(name) = p.text("Enter Supplier Name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(contact) = p.text("Enter Contact Info: ")? else {
            return Ok(Flow::Exit);
        };

        let result = self.inventory.suppliers.add(Supplier::new(id, name, contact));
        self.report(result, "Supplier added.")
    }

    fn place_order(&mut self) -> anyhow::Result<Flow> {
        let p = &mut self.prompter;
        let Some(count) = p.parsed::<usize>("Enter number of products to order: ")? else {
            return Ok(Flow::Exit);
        };

        let mut lines = Vec::new();
        for _ in 0..count {
            let Some(product_id) = p.parsed::<ProductId>("Enter Product ID: ")? else {
                return Ok(Flow::Exit);
            };
            let Some(quantity) = p.parsed::<u32>("Enter Quantity: ")? else {
                return Ok(Flow::Exit);
            };
            lines.push(LineRequest::new(product_id, quantity));
        }

        let request = PlaceOrder {
            lines,
            placed_at: Utc::now(),
        };
        let Inventory { catalog, ledger, .. } = &mut self.inventory;
        match place_order(catalog, ledger, &request) {
            Ok(order) => {
                self.prompter.say("Order placed successfully!")?;
                self.prompter.say(&order)?;
            }
            Err(err) => self.prompter.say(format_args!("Error: {err}"))?,
        }
        Ok(Flow::Continue)
    }

    fn report(&mut self, result: Result<(), DomainError>, success: &str) -> anyhow::Result<Flow> {
        match result {
            Ok(()) => self.prompter.say(success)?,
            Err(err) => self.prompter.say(format_args!("Error: {err}"))?,
        }
        Ok(Flow::Continue)
    }
}
