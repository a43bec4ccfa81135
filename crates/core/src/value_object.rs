//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are domain objects that are **immutable** and **compared by value**.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: No identity (two value objects with same values are equal)
/// - **Entity**: Has identity (two entities with same ID are the same entity)
///
/// Example:
/// - `Money(250)` is a value object
/// - `Product { id: ProductId(1), .. }` is an entity
///
/// To "modify" a value object, create a new one with the new values
/// (see `Money::checked_add`).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
