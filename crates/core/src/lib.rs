//! `stockroom-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no console, no IO).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::Aggregate;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{OrderId, ProductId, SupplierId};
pub use money::Money;
pub use value_object::ValueObject;
