//! Table wiring configuration and its validation errors.
//!
//! # Responsibility
//! - Describe one concrete table: its logical name, storage table and entity.
//! - Report wiring mistakes once, when a table or factory is constructed.
//!
//! # Invariants
//! - Configuration errors are raised at construction, never at query time.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Declaration of one concrete table type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableConfig {
    /// Logical name of the table type, used in error messages.
    pub name: String,
    /// Storage table name. Required.
    pub table_name: Option<String>,
    /// Registered entity name. Required.
    pub entity: Option<String>,
}

impl TableConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

/// Table or entity factory wiring failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    TableNameNotDefined {
        table: String,
    },
    EntityClassNotDefined {
        table: String,
    },
    EntityClassNonexistent {
        table: Option<String>,
        entity: String,
    },
    EntityClassInvalidSuperclass {
        entity: String,
        reason: String,
    },
}

impl ConfigError {
    /// Name of the missing required field, for the not-defined variants.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            Self::TableNameNotDefined { .. } => Some("tableName"),
            Self::EntityClassNotDefined { .. } => Some("entityClass"),
            Self::EntityClassNonexistent { .. } | Self::EntityClassInvalidSuperclass { .. } => {
                None
            }
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TableNameNotDefined { table } => {
                write!(f, "table {table} does not have a table name defined")
            }
            Self::EntityClassNotDefined { table } => {
                write!(f, "table {table} does not have an entity defined")
            }
            Self::EntityClassNonexistent {
                table: Some(table),
                entity,
            } => write!(f, "table {table} entity {entity} is not registered"),
            Self::EntityClassNonexistent {
                table: None,
                entity,
            } => write!(f, "entity {entity} is not registered"),
            Self::EntityClassInvalidSuperclass { entity, reason } => {
                write!(f, "entity {entity} is not a valid entity type: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, TableConfig};

    #[test]
    fn builder_sets_optional_fields() {
        let config = TableConfig::new("CarTable").table_name("cars").entity("Car");
        assert_eq!(config.name, "CarTable");
        assert_eq!(config.table_name.as_deref(), Some("cars"));
        assert_eq!(config.entity.as_deref(), Some("Car"));
    }

    #[test]
    fn messages_name_the_table_type() {
        let err = ConfigError::TableNameNotDefined {
            table: "Foo".to_string(),
        };
        assert_eq!(err.to_string(), "table Foo does not have a table name defined");
        assert_eq!(err.missing_field(), Some("tableName"));
    }
}
