//! Domain events emitted by the catalog and order aggregates.

pub mod event;

pub use event::Event;
