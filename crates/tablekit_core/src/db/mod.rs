//! SQLite connection bootstrap and store error type.
//!
//! # Responsibility
//! - Open and configure SQLite connections for tablekit tables.
//! - Carry store failures to callers unchanged.
//!
//! # Invariants
//! - Schema creation is the caller's concern; no migrations run here.
//! - Store errors are wrapped once and never retried.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory, open_db_with, DbOptions, DbTarget};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// A stored value has a kind the entity model cannot carry (e.g. blob).
    UnsupportedValue { column: String, kind: &'static str },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedValue { column, kind } => {
                write!(f, "column `{column}` returned unsupported {kind} value")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedValue { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
