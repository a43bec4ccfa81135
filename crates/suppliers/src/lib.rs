//! Supplier directory domain module.
//!
//! Suppliers are recorded once and never change; the directory only grows.

pub mod directory;

pub use directory::{
    RegisterSupplier, Supplier, SupplierCommand, SupplierDirectory, SupplierEvent,
    SupplierRegistered,
};
