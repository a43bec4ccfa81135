//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Collections in this workspace (catalog, directory, ledger) key their
/// uniqueness checks and lookups off this identifier.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// First entity in `items` whose id is `id`.
pub fn find_by_id<E: Entity>(items: &[E], id: E::Id) -> Option<&E> {
    items.iter().find(|item| item.id() == id)
}

/// Index of the first entity in `items` whose id is `id`.
pub fn position_by_id<E: Entity>(items: &[E], id: E::Id) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}
