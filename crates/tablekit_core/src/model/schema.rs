//! Column schema declarations.
//!
//! # Responsibility
//! - Hold the ordered column list of one entity type.
//! - Wrap application fields with the storage-managed columns.
//!
//! # Invariants
//! - Column order is declaration order and never changes after build.
//! - `Schema::for_entity` always yields `id` first and `modified`, `created` last.

use crate::model::value::ColumnType;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const ID_COLUMN: &str = "id";
pub const MODIFIED_COLUMN: &str = "modified";
pub const CREATED_COLUMN: &str = "created";

/// Columns whose values are assigned by storage, not by application code.
pub const STORAGE_MANAGED_COLUMNS: &[&str] = &[ID_COLUMN, MODIFIED_COLUMN, CREATED_COLUMN];

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid"));

/// Returns whether `name` is a plain SQL identifier safe to backtick-quote.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

pub fn is_storage_managed(name: &str) -> bool {
    STORAGE_MANAGED_COLUMNS.contains(&name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Builds a schema from exactly the given columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Builds the full schema of an entity type from its application fields.
    pub fn for_entity<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnType)>,
        S: Into<String>,
    {
        let mut columns = vec![Column::new(ID_COLUMN, ColumnType::Integer)];
        columns.extend(
            fields
                .into_iter()
                .map(|(name, column_type)| Column::new(name, column_type)),
        );
        columns.push(Column::new(MODIFIED_COLUMN, ColumnType::Timestamp));
        columns.push(Column::new(CREATED_COLUMN, ColumnType::Timestamp));
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_type(&self, name: &str) -> Option<&ColumnType> {
        self.column(name).map(|column| &column.column_type)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of columns that are not storage-managed.
    pub fn application_field_count(&self) -> usize {
        self.names().filter(|name| !is_storage_managed(name)).count()
    }
}
