//! Minimal data-mapper binding entity records to relational table rows.
//! Tracks per-field changes so only altered columns are persisted.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod sql;
pub mod table;

pub use config::{ConfigError, TableConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig};
pub use model::entity::{Entity, EntityDescriptor, EntityError};
pub use model::factory::EntityFactory;
pub use model::property::{EntityProperty, ValueTypeError};
pub use model::record::Record;
pub use model::registry::EntityRegistry;
pub use model::schema::{Column, Schema};
pub use model::value::{ColumnType, Value};
pub use sql::command::{CommandError, SqlCommand};
pub use table::{StatementExecutor, Table, TableError, TableResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
