//! Entity records with per-field change tracking.
//!
//! # Responsibility
//! - Hold one value per schema column of an entity type.
//! - Track which columns were altered since construction or load.
//!
//! # Invariants
//! - Every altered index refers to a schema column.
//! - A rejected `set` leaves values and altered set untouched.
//! - Entities rebuilt from stored rows start with an empty altered set.

use crate::model::property::{EntityProperty, ValueTypeError};
use crate::model::record::Record;
use crate::model::schema::{
    is_identifier, is_storage_managed, Schema, CREATED_COLUMN, ID_COLUMN, MODIFIED_COLUMN,
};
use crate::model::value::{ColumnType, Value};
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Property access or assignment failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    UnknownProperty {
        entity: String,
        property: String,
    },
    InvalidValueType {
        entity: String,
        property: String,
        expected: String,
        actual: String,
    },
}

impl Display for EntityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownProperty { entity, property } => {
                write!(f, "entity {entity} does not have a property named {property}")
            }
            Self::InvalidValueType {
                entity,
                property,
                expected,
                actual,
            } => write!(
                f,
                "entity {entity} property {property} is of type {actual} and not {expected}"
            ),
        }
    }
}

impl Error for EntityError {}

/// Static description of one entity type: its name and full column schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    name: String,
    schema: Schema,
}

impl EntityDescriptor {
    /// Describes an entity type from its application fields.
    ///
    /// The storage-managed `id`, `modified` and `created` columns are added.
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnType)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            schema: Schema::for_entity(fields),
        }
    }

    /// Describes an entity type from an already complete schema.
    pub fn from_schema(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Checks that this descriptor fulfils the entity contract.
    ///
    /// Returns a human-readable reason on violation.
    pub fn check_contract(&self) -> Result<(), String> {
        if self.schema.application_field_count() == 0 {
            return Err("declares no application fields".to_string());
        }

        let mut seen = HashSet::new();
        for column in self.schema.columns() {
            if !is_identifier(&column.name) {
                return Err(format!("column name `{}` is not an identifier", column.name));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(format!("column `{}` is declared twice", column.name));
            }
        }

        match self.schema.columns().first() {
            Some(first) if first.name == ID_COLUMN && first.column_type == ColumnType::Integer => {}
            _ => return Err("first column must be integer `id`".to_string()),
        }

        for name in [MODIFIED_COLUMN, CREATED_COLUMN] {
            if self.schema.column_type(name) != Some(&ColumnType::Timestamp) {
                return Err(format!("column `{name}` must be declared as timestamp"));
            }
        }

        Ok(())
    }
}

/// In-memory record of one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    descriptor: Arc<EntityDescriptor>,
    values: Vec<Value>,
    altered: BTreeSet<usize>,
}

impl Entity {
    /// Creates an unpersisted entity and assigns `initial` through `set`.
    ///
    /// Every assigned column lands in the altered set. Entries naming the
    /// storage-managed columns are skipped so they keep their defaults.
    pub fn new<I, K, V>(descriptor: &Arc<EntityDescriptor>, initial: I) -> Result<Self, EntityError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut entity = Self::blank(Arc::clone(descriptor));
        for (name, value) in initial {
            let name = name.as_ref();
            if is_storage_managed(name) {
                continue;
            }
            entity.set(name, value)?;
        }
        Ok(entity)
    }

    /// Rebuilds a stored entity; no validation and nothing marked altered.
    pub(crate) fn from_row(descriptor: Arc<EntityDescriptor>, row: &Record) -> Self {
        let values = descriptor
            .schema()
            .names()
            .map(|name| row.get(name).cloned().unwrap_or_default())
            .collect();
        Self {
            descriptor,
            values,
            altered: BTreeSet::new(),
        }
    }

    fn blank(descriptor: Arc<EntityDescriptor>) -> Self {
        let values = vec![Value::Null; descriptor.schema().len()];
        Self {
            descriptor,
            values,
            altered: BTreeSet::new(),
        }
    }

    pub fn entity_name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &Arc<EntityDescriptor> {
        &self.descriptor
    }

    /// Declared column schema of this entity type.
    pub fn columns(&self) -> &Schema {
        self.descriptor.schema()
    }

    /// Validates and stores `value`, marking `name` as altered.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), EntityError> {
        let index = self.index_of(name)?;
        let column_type = self.columns().columns()[index].column_type.clone();
        let value = EntityProperty::new(column_type)
            .validate_value(value.into())
            .map_err(|err| self.type_error(name, err))?;

        self.values[index] = value;
        self.altered.insert(index);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Value, EntityError> {
        let index = self.index_of(name)?;
        Ok(&self.values[index])
    }

    /// Stored identifier, `None` while unpersisted.
    pub fn id(&self) -> Option<i64> {
        self.get(ID_COLUMN).ok().and_then(Value::as_integer)
    }

    pub fn is_altered(&self) -> bool {
        !self.altered.is_empty()
    }

    /// Current values of altered columns.
    ///
    /// Ordered by schema position, not by assignment order: setting `hp`
    /// and then `make` yields `make` first. Repeated sets of one column
    /// appear once.
    pub fn altered_columns(&self) -> Record {
        self.altered
            .iter()
            .map(|&index| self.entry(index))
            .collect()
    }

    /// Full snapshot of every schema column, `id` included.
    pub fn to_record(&self) -> Record {
        (0..self.values.len()).map(|index| self.entry(index)).collect()
    }

    /// Altered columns, plus `id` when requested and set.
    pub fn altered_to_record(&self, include_id: bool) -> Record {
        let mut record = self.altered_columns();
        if include_id {
            if let Some(id) = self.id() {
                record.insert(ID_COLUMN, id);
            }
        }
        record
    }

    fn entry(&self, index: usize) -> (String, Value) {
        (
            self.columns().columns()[index].name.clone(),
            self.values[index].clone(),
        )
    }

    fn index_of(&self, name: &str) -> Result<usize, EntityError> {
        self.columns()
            .position(name)
            .ok_or_else(|| EntityError::UnknownProperty {
                entity: self.entity_name().to_string(),
                property: name.to_string(),
            })
    }

    fn type_error(&self, name: &str, err: ValueTypeError) -> EntityError {
        EntityError::InvalidValueType {
            entity: self.entity_name().to_string(),
            property: name.to_string(),
            expected: err.expected,
            actual: err.actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EntityDescriptor;
    use crate::model::schema::{Column, Schema};
    use crate::model::value::ColumnType;

    #[test]
    fn contract_accepts_entity_built_from_fields() {
        let descriptor = EntityDescriptor::new("Car", [("make", ColumnType::Text)]);
        assert!(descriptor.check_contract().is_ok());
    }

    #[test]
    fn contract_rejects_descriptor_without_fields() {
        let descriptor = EntityDescriptor::new("Empty", Vec::<(String, ColumnType)>::new());
        let reason = descriptor.check_contract().unwrap_err();
        assert!(reason.contains("no application fields"));
    }

    #[test]
    fn contract_rejects_duplicate_storage_column() {
        let descriptor = EntityDescriptor::new(
            "Car",
            [("make", ColumnType::Text), ("created", ColumnType::Timestamp)],
        );
        let reason = descriptor.check_contract().unwrap_err();
        assert!(reason.contains("declared twice"), "unexpected reason: {reason}");
    }

    #[test]
    fn contract_rejects_schema_without_id() {
        let schema = Schema::new(vec![
            Column::new("make", ColumnType::Text),
            Column::new("modified", ColumnType::Timestamp),
            Column::new("created", ColumnType::Timestamp),
        ]);
        let descriptor = EntityDescriptor::from_schema("Car", schema);
        let reason = descriptor.check_contract().unwrap_err();
        assert!(reason.contains("`id`"));
    }
}
