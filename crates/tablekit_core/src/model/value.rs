//! Column types and property values.
//!
//! # Responsibility
//! - Define the declared semantic type of a column.
//! - Define the runtime value carried by entity properties and bindings.
//!
//! # Invariants
//! - `Value::Null` is the unset sentinel and is valid for every column type.
//! - Type names returned by `type_name()` are stable and used in errors.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Wire format for timestamps written to and read from storage.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Declared semantic type of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Boolean,
    Timestamp,
    /// Text restricted to a fixed set of variants.
    Enumerated(Vec<String>),
}

impl ColumnType {
    /// Builds an enumerated type from its allowed variants.
    pub fn enumerated<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enumerated(variants.into_iter().map(Into::into).collect())
    }

    pub fn type_name(&self) -> String {
        match self {
            Self::Integer => "integer".to_string(),
            Self::Float => "float".to_string(),
            Self::Text => "string".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::Timestamp => "timestamp".to_string(),
            Self::Enumerated(variants) => format!("enum({})", variants.join("|")),
        }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.type_name())
    }
}

/// Runtime value of one entity property or statement binding.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Timestamp(#[serde(serialize_with = "serialize_timestamp")] NaiveDateTime),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Timestamp(_) => "timestamp",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(value) => Some(*value),
            _ => None,
        }
    }
}

/// Snapshots use the storage format rather than ISO-8601.
fn serialize_timestamp<S: Serializer>(
    value: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnType, Value};
    use chrono::NaiveDate;

    #[test]
    fn enumerated_type_name_lists_variants() {
        let kind = ColumnType::enumerated(["petrol", "diesel"]);
        assert_eq!(kind.type_name(), "enum(petrol|diesel)");
    }

    #[test]
    fn option_none_converts_to_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::Text("a".to_string()));
    }

    #[test]
    fn timestamp_serializes_in_storage_format() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(8, 30, 5))
            .unwrap();
        let json = serde_json::to_string(&Value::Timestamp(ts)).unwrap();
        assert_eq!(json, r#""2024-01-01 08:30:05""#);
    }
}
