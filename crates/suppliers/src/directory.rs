use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stockroom_core::entity::find_by_id;
use stockroom_core::{Aggregate, DomainError, DomainResult, Entity, SupplierId};
use stockroom_events::Event;

/// A supplier and how to reach them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: SupplierId,
    name: String,
    contact_info: String,
}

impl Supplier {
    pub fn new(id: SupplierId, name: impl Into<String>, contact_info: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            contact_info: contact_info.into(),
        }
    }

    pub fn id_typed(&self) -> SupplierId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact_info(&self) -> &str {
        &self.contact_info
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> SupplierId {
        self.id
    }
}

impl core::fmt::Display for Supplier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} | {} | Contact: {}", self.id, self.name, self.contact_info)
    }
}

/// Command: RegisterSupplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSupplier {
    pub supplier: Supplier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierCommand {
    RegisterSupplier(RegisterSupplier),
}

/// Event: SupplierRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRegistered {
    pub supplier: Supplier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierEvent {
    SupplierRegistered(SupplierRegistered),
}

impl Event for SupplierEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SupplierEvent::SupplierRegistered(_) => "suppliers.supplier.registered",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}

/// All known suppliers, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierDirectory {
    suppliers: Vec<Supplier>,
    version: u64,
}

impl SupplierDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a supplier. A second supplier with an existing id is
    /// rejected with `Conflict`.
    pub fn add(&mut self, supplier: Supplier) -> DomainResult<()> {
        let id = supplier.id_typed();
        let cmd = SupplierCommand::RegisterSupplier(RegisterSupplier { supplier });
        self.execute(&cmd)?;
        info!(supplier_id = %id, "supplier registered");
        Ok(())
    }

    pub fn find_by_id(&self, id: SupplierId) -> Option<&Supplier> {
        find_by_id(&self.suppliers, id)
    }

    pub fn list(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }
}

impl Aggregate for SupplierDirectory {
    type Command = SupplierCommand;
    type Event = SupplierEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        debug!(event = event.event_type(), "applying supplier event");
        match event {
            SupplierEvent::SupplierRegistered(e) => {
                self.suppliers.push(e.supplier.clone());
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SupplierCommand::RegisterSupplier(cmd) => self.handle_register(cmd),
        }
    }
}

impl SupplierDirectory {
    fn handle_register(&self, cmd: &RegisterSupplier) -> Result<Vec<SupplierEvent>, DomainError> {
        let id = cmd.supplier.id_typed();
        if self.find_by_id(id).is_some() {
            return Err(DomainError::conflict(format!("supplier {id} already exists")));
        }

        if cmd.supplier.name().trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(vec![SupplierEvent::SupplierRegistered(SupplierRegistered {
            supplier: cmd.supplier.clone(),
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Supplier {
        Supplier::new(SupplierId::new(7), "Acme", "acme@example.com")
    }

    #[test]
    fn add_then_list_and_find() {
        let mut directory = SupplierDirectory::new();
        directory.add(acme()).unwrap();
        directory
            .add(Supplier::new(SupplierId::new(3), "Globex", "+1 555 0100"))
            .unwrap();

        let names: Vec<&str> = directory.list().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Acme", "Globex"]);
        assert_eq!(
            directory.find_by_id(SupplierId::new(3)).unwrap().contact_info(),
            "+1 555 0100"
        );
        assert!(directory.find_by_id(SupplierId::new(4)).is_none());
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut directory = SupplierDirectory::new();
        directory.add(acme()).unwrap();

        let err = directory
            .add(Supplier::new(SupplierId::new(7), "Impostor", "x"))
            .unwrap_err();
        match err {
            DomainError::Conflict(msg) if msg.contains("supplier 7") => {}
            _ => panic!("Expected Conflict for duplicate supplier id"),
        }
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.list()[0].name(), "Acme");
    }

    #[test]
    fn add_rejects_blank_name() {
        let mut directory = SupplierDirectory::new();
        let err = directory
            .add(Supplier::new(SupplierId::new(1), "", "x"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(directory.is_empty());
        assert_eq!(directory.version(), 0);
    }

    #[test]
    fn display_matches_listing_format() {
        assert_eq!(acme().to_string(), "7 | Acme | Contact: acme@example.com");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: list() returns suppliers in the order they were added.
            #[test]
            fn list_preserves_insertion_order(
                ids in prop::collection::hash_set(0u32..10_000, 0..30)
            ) {
                let ids: Vec<u32> = ids.into_iter().collect();
                let mut directory = SupplierDirectory::new();
                for id in &ids {
                    directory
                        .add(Supplier::new(SupplierId::new(*id), format!("s{id}"), "contact"))
                        .unwrap();
                }

                let listed: Vec<u32> = directory.list().iter().map(|s| s.id_typed().get()).collect();
                prop_assert_eq!(listed, ids);
            }
        }
    }
}
