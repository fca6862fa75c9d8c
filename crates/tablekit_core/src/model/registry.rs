//! Explicit name to entity descriptor registry.
//!
//! Populated once at startup; tables and factories resolve their entity
//! type by name through it.

use crate::model::entity::EntityDescriptor;
use log::warn;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entries: BTreeMap<String, Arc<EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `descriptor` under its own name and returns the shared handle.
    ///
    /// A later registration with the same name replaces the earlier one.
    pub fn register(&mut self, descriptor: EntityDescriptor) -> Arc<EntityDescriptor> {
        let descriptor = Arc::new(descriptor);
        let name = descriptor.name().to_string();
        if self
            .entries
            .insert(name.clone(), Arc::clone(&descriptor))
            .is_some()
        {
            warn!("event=entity_register module=registry status=replaced entity={name}");
        }
        descriptor
    }

    pub fn with(mut self, descriptor: EntityDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<EntityDescriptor>> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
