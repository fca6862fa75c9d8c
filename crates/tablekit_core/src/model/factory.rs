//! Entity reconstruction from stored rows.

use crate::config::ConfigError;
use crate::model::entity::{Entity, EntityDescriptor};
use crate::model::record::Record;
use crate::model::registry::EntityRegistry;
use std::sync::Arc;

/// Builds entities of one validated entity type from stored rows.
#[derive(Debug, Clone)]
pub struct EntityFactory {
    descriptor: Arc<EntityDescriptor>,
}

impl EntityFactory {
    /// Resolves `entity_name` and checks it fulfils the entity contract.
    pub fn try_new(registry: &EntityRegistry, entity_name: &str) -> Result<Self, ConfigError> {
        let descriptor = registry
            .get(entity_name)
            .ok_or_else(|| ConfigError::EntityClassNonexistent {
                table: None,
                entity: entity_name.to_string(),
            })?;
        Self::from_descriptor(Arc::clone(descriptor))
    }

    pub fn from_descriptor(descriptor: Arc<EntityDescriptor>) -> Result<Self, ConfigError> {
        descriptor
            .check_contract()
            .map_err(|reason| ConfigError::EntityClassInvalidSuperclass {
                entity: descriptor.name().to_string(),
                reason,
            })?;
        Ok(Self { descriptor })
    }

    pub fn descriptor(&self) -> &Arc<EntityDescriptor> {
        &self.descriptor
    }

    /// Rebuilds one entity; row values are trusted and not re-validated.
    pub fn create_from_row(&self, row: &Record) -> Entity {
        Entity::from_row(Arc::clone(&self.descriptor), row)
    }

    pub fn create_from_rows(&self, rows: &[Record]) -> Vec<Entity> {
        rows.iter().map(|row| self.create_from_row(row)).collect()
    }
}
