//! Per-entity-type table repositories.
//!
//! # Responsibility
//! - Validate table wiring once at construction.
//! - Run find / insert / update statements built by `SqlCommand`.
//! - Turn stored rows into entities through `EntityFactory`.
//!
//! # Invariants
//! - Configuration errors surface from `Table::try_new`, never at query time.
//! - Rejected conditions or entities never reach the connection.
//! - Only altered columns are written by `update`.
//! - Store errors are returned unchanged; nothing is retried or logged as failure.

pub mod codec;
pub mod executor;

use crate::config::{ConfigError, TableConfig};
use crate::db::DbError;
use crate::model::entity::{Entity, EntityError};
use crate::model::factory::EntityFactory;
use crate::model::property::EntityProperty;
use crate::model::record::Record;
use crate::model::registry::EntityRegistry;
use crate::model::schema::{Schema, CREATED_COLUMN, ID_COLUMN, MODIFIED_COLUMN};
use crate::model::value::Value;
use crate::sql::command::{CommandError, SqlCommand};
use chrono::{Local, NaiveDateTime, Timelike};
use log::debug;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

pub use executor::StatementExecutor;

pub type TableResult<T> = Result<T, TableError>;

/// Table operation error.
#[derive(Debug)]
pub enum TableError {
    Config(ConfigError),
    Entity(EntityError),
    Command(CommandError),
    Db(DbError),
    InvalidData(String),
    EntityMismatch { expected: String, actual: String },
    NotImplemented(&'static str),
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Entity(err) => write!(f, "{err}"),
            Self::Command(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
            Self::EntityMismatch { expected, actual } => {
                write!(f, "table expects entity {expected}, got {actual}")
            }
            Self::NotImplemented(operation) => write!(f, "table {operation} is not implemented"),
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Entity(err) => Some(err),
            Self::Command(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::EntityMismatch { .. } | Self::NotImplemented(_) => None,
        }
    }
}

impl From<ConfigError> for TableError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<EntityError> for TableError {
    fn from(value: EntityError) -> Self {
        Self::Entity(value)
    }
}

impl From<CommandError> for TableError {
    fn from(value: CommandError) -> Self {
        Self::Command(value)
    }
}

impl From<DbError> for TableError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for TableError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository for one entity type stored in one table.
///
/// Borrows the connection; several tables may share the same handle.
#[derive(Debug)]
pub struct Table<'conn, C: StatementExecutor + ?Sized = Connection> {
    conn: &'conn C,
    name: String,
    command: SqlCommand,
    factory: EntityFactory,
}

impl<'conn, C: StatementExecutor + ?Sized> Table<'conn, C> {
    /// Validates `config` against `registry` and prepares the statement builder.
    ///
    /// # Errors
    /// Checked in order: missing table name, missing entity, unregistered
    /// entity, entity violating the entity contract.
    pub fn try_new(
        conn: &'conn C,
        registry: &EntityRegistry,
        config: &TableConfig,
    ) -> Result<Self, ConfigError> {
        let table_name = declared(&config.table_name).ok_or_else(|| {
            ConfigError::TableNameNotDefined {
                table: config.name.clone(),
            }
        })?;
        let entity_name = declared(&config.entity).ok_or_else(|| {
            ConfigError::EntityClassNotDefined {
                table: config.name.clone(),
            }
        })?;
        let descriptor =
            registry
                .get(entity_name)
                .ok_or_else(|| ConfigError::EntityClassNonexistent {
                    table: Some(config.name.clone()),
                    entity: entity_name.to_string(),
                })?;

        let factory = EntityFactory::from_descriptor(Arc::clone(descriptor))?;
        let command = SqlCommand::new(table_name, descriptor.schema().clone());

        debug!(
            "event=table_init module=table status=ok table={} entity={} columns={}",
            table_name,
            entity_name,
            command.schema().len()
        );

        Ok(Self {
            conn,
            name: config.name.clone(),
            command,
            factory,
        })
    }

    /// Logical name of the table type.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> &str {
        self.command.table_name()
    }

    pub fn entity_name(&self) -> &str {
        self.factory.descriptor().name()
    }

    pub fn command(&self) -> &SqlCommand {
        &self.command
    }

    fn schema(&self) -> &Schema {
        self.command.schema()
    }

    /// Loads every row of the table.
    pub fn find_all(&self) -> TableResult<Vec<Entity>> {
        let started_at = Instant::now();
        let rows = self.conn.fetch(self.command.select_from(), &Record::new())?;
        let entities = self.entities_from_rows(rows)?;

        debug!(
            "event=table_find_all module=table status=ok table={} rows={} duration_ms={}",
            self.table_name(),
            entities.len(),
            started_at.elapsed().as_millis()
        );
        Ok(entities)
    }

    /// Loads rows matching every `column = value` condition.
    ///
    /// All keys are checked before any value; the first unknown key or
    /// mistyped value rejects the call before a statement runs. Clause order
    /// follows condition order. No conditions behaves like `find_all`.
    pub fn find_by<I, K, V>(&self, conditions: I) -> TableResult<Vec<Entity>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let conditions: Record = conditions.into_iter().collect();
        if conditions.is_empty() {
            return self.find_all();
        }

        if let Some(unknown) = conditions.keys().find(|key| !self.schema().contains(key)) {
            return Err(self.unknown_property(unknown));
        }

        let mut bindings = Record::with_capacity(conditions.len());
        for (key, value) in conditions {
            let property = match self.schema().column_type(&key) {
                Some(column_type) => EntityProperty::new(column_type.clone()),
                None => return Err(self.unknown_property(&key)),
            };
            let value = property
                .validate_value(value)
                .map_err(|err| EntityError::InvalidValueType {
                    entity: self.entity_name().to_string(),
                    property: key.clone(),
                    expected: err.expected,
                    actual: err.actual,
                })?;
            bindings.insert(key, value);
        }

        let started_at = Instant::now();
        let keys: Vec<&str> = bindings.keys().collect();
        let sql = self.command.select_from_where(&keys)?;
        let rows = self.conn.fetch(&sql, &bindings)?;
        let entities = self.entities_from_rows(rows)?;

        debug!(
            "event=table_find_by module=table status=ok table={} conditions={} rows={} duration_ms={}",
            self.table_name(),
            keys.len(),
            entities.len(),
            started_at.elapsed().as_millis()
        );
        Ok(entities)
    }

    /// Inserts the full snapshot of `entity` with fresh timestamps.
    ///
    /// `modified` and `created` are bound to the same current instant. The
    /// in-memory entity is left untouched; refreshing `id` and timestamps is
    /// the caller's concern.
    pub fn insert<'e>(&self, entity: &'e Entity) -> TableResult<&'e Entity> {
        self.ensure_entity_type(entity)?;

        let started_at = Instant::now();
        let now = current_timestamp();
        let mut bindings = entity.to_record();
        bindings.remove(ID_COLUMN);
        bindings.insert(MODIFIED_COLUMN, now);
        bindings.insert(CREATED_COLUMN, now);

        let changed = self
            .conn
            .execute_named(self.command.insert_into(), &bindings)?;

        debug!(
            "event=table_insert module=table status=ok table={} rows={} duration_ms={}",
            self.table_name(),
            changed,
            started_at.elapsed().as_millis()
        );
        Ok(entity)
    }

    /// Writes the altered columns of `entity` to its row.
    ///
    /// Returns `false` without touching storage when nothing is altered.
    /// Otherwise stamps `modified` and returns whether a row was affected.
    pub fn update(&self, entity: &mut Entity) -> TableResult<bool> {
        self.ensure_entity_type(entity)?;
        if !entity.is_altered() {
            return Ok(false);
        }

        let started_at = Instant::now();
        entity.set(MODIFIED_COLUMN, current_timestamp())?;

        let altered = entity.altered_columns();
        let keys: Vec<&str> = altered.keys().collect();
        let sql = self.command.update_set_where(&keys)?;
        let changed = self
            .conn
            .execute_named(&sql, &entity.altered_to_record(true))?;

        debug!(
            "event=table_update module=table status=ok table={} columns={} rows={} duration_ms={}",
            self.table_name(),
            keys.len(),
            changed,
            started_at.elapsed().as_millis()
        );
        Ok(changed > 0)
    }

    /// Row deletion is not supported; always fails.
    pub fn delete(&self, _entity: &Entity) -> TableResult<bool> {
        Err(TableError::NotImplemented("delete"))
    }

    fn entities_from_rows(&self, rows: Vec<Record>) -> TableResult<Vec<Entity>> {
        rows.into_iter()
            .map(|row| -> TableResult<Entity> {
                let row = codec::decode_row(self.table_name(), self.schema(), row)
                    .map_err(TableError::InvalidData)?;
                Ok(self.factory.create_from_row(&row))
            })
            .collect()
    }

    fn unknown_property(&self, name: &str) -> TableError {
        EntityError::UnknownProperty {
            entity: self.entity_name().to_string(),
            property: name.to_string(),
        }
        .into()
    }

    fn ensure_entity_type(&self, entity: &Entity) -> TableResult<()> {
        if !Arc::ptr_eq(entity.descriptor(), self.factory.descriptor())
            && entity.descriptor().as_ref() != self.factory.descriptor().as_ref()
        {
            return Err(TableError::EntityMismatch {
                expected: self.entity_name().to_string(),
                actual: entity.entity_name().to_string(),
            });
        }
        Ok(())
    }
}

fn declared(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}

/// Current local time at second precision, as written to storage.
pub fn current_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
