//! Aggregate trait for command/event style domain models.

/// Aggregate execution semantics (pure, deterministic).
///
/// - **Decision logic**: `handle(&self, cmd)` returns events.
/// - **State mutation**: `apply(&mut self, event)` evolves state.
///
/// Because every check happens in `handle` before anything is applied, a
/// rejected command leaves the aggregate exactly as it was. Multi-step
/// operations (e.g. reserving stock for every line of an order) rely on this
/// to be all-or-nothing without any rollback.
pub trait Aggregate {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Monotonically increasing version of the aggregate's state (+1 per
    /// applied event).
    fn version(&self) -> u64;

    /// Evolve in-memory state from a single event.
    ///
    /// Events returned by `handle` have already been validated, so `apply`
    /// must not fail.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events to emit given the current state and a command.
    ///
    /// This must not mutate state. State evolution is done through `apply`.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// Decide, then apply every resulting event.
    fn execute(&mut self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = self.handle(command)?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }
}
