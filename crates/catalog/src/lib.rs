//! Catalog domain module.
//!
//! This crate tracks products and their stock levels, implemented purely as
//! deterministic domain logic (no IO, no console, no storage).

pub mod catalog;
pub mod product;

pub use catalog::{
    AddProduct, Catalog, CatalogCommand, CatalogEvent, ProductAdded, QuantitySet, ReserveStock,
    SetQuantity, StockReservation, StockReserved,
};
pub use product::Product;
