//! SQL statement text for one table and schema.
//!
//! # Responsibility
//! - Derive INSERT / SELECT / UPDATE text with colon-prefixed named
//!   placeholders matching column names.
//!
//! # Invariants
//! - Table, INSERT column and SET identifiers are backtick-quoted; SELECT
//!   conditions use bare column names. Statements end with `;`.
//! - `id` renders as literal `NULL` in INSERT and is never a SET target
//!   unless explicitly requested.
//! - WHERE/SET clause order follows the caller's key order.

use crate::model::schema::{Schema, ID_COLUMN};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// A keyed statement was requested with no keys.
    EmptyKeySet { statement: &'static str },
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKeySet { statement } => {
                write!(f, "{statement} statement requires at least one key")
            }
        }
    }
}

impl Error for CommandError {}

/// Immutable statement builder; fixed statements are rendered once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlCommand {
    table_name: String,
    schema: Schema,
    select_from: String,
    insert_into: String,
}

impl SqlCommand {
    pub fn new(table_name: impl Into<String>, schema: Schema) -> Self {
        let table_name = table_name.into();
        let select_from = format!("SELECT * FROM {};", quote(&table_name));
        let insert_into = render_insert(&table_name, &schema);
        Self {
            table_name,
            schema,
            select_from,
            insert_into,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn select_from(&self) -> &str {
        &self.select_from
    }

    pub fn select_from_where<K: AsRef<str>>(&self, keys: &[K]) -> Result<String, CommandError> {
        if keys.is_empty() {
            return Err(CommandError::EmptyKeySet {
                statement: "SELECT ... WHERE",
            });
        }

        let conditions = keys
            .iter()
            .map(|key| condition(key.as_ref()))
            .collect::<Vec<_>>()
            .join(" AND ");
        Ok(format!(
            "SELECT * FROM {} WHERE {conditions};",
            quote(&self.table_name)
        ))
    }

    pub fn insert_into(&self) -> &str {
        &self.insert_into
    }

    pub fn update_set_where<K: AsRef<str>>(&self, keys: &[K]) -> Result<String, CommandError> {
        if keys.is_empty() {
            return Err(CommandError::EmptyKeySet {
                statement: "UPDATE ... SET",
            });
        }

        let assignments = keys
            .iter()
            .map(|key| assignment(key.as_ref()))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!(
            "UPDATE {} SET {assignments} WHERE {};",
            quote(&self.table_name),
            assignment(ID_COLUMN)
        ))
    }
}

fn render_insert(table_name: &str, schema: &Schema) -> String {
    let columns = schema.names().map(quote).collect::<Vec<_>>().join(", ");
    let values = schema
        .names()
        .map(|name| {
            if name == ID_COLUMN {
                "NULL".to_string()
            } else {
                format!(":{name}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({columns}) VALUES ({values});",
        quote(table_name)
    )
}

fn condition(name: &str) -> String {
    format!("{name} = :{name}")
}

fn assignment(name: &str) -> String {
    format!("{} = :{name}", quote(name))
}

fn quote(identifier: &str) -> String {
    format!("`{identifier}`")
}
