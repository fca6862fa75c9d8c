//! Conversion between entity values and SQLite storage values.
//!
//! # Invariants
//! - Booleans are stored as `0`/`1` integers.
//! - Timestamps are stored as `YYYY-MM-DD HH:MM:SS` text.
//! - Decoding rejects stored values that do not fit the declared column type.

use crate::model::record::Record;
use crate::model::schema::Schema;
use crate::model::value::{ColumnType, Value, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use rusqlite::types::Value as SqlValue;

/// Encodes one entity value for binding.
pub fn encode_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(value) => SqlValue::Integer(*value),
        Value::Float(value) => SqlValue::Real(*value),
        Value::Text(value) => SqlValue::Text(value.clone()),
        Value::Boolean(value) => SqlValue::Integer(i64::from(*value)),
        Value::Timestamp(value) => SqlValue::Text(format_timestamp(value)),
    }
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Decodes a stored row against `schema`.
///
/// Columns unknown to the schema are kept as returned by storage.
pub fn decode_row(table: &str, schema: &Schema, row: Record) -> Result<Record, String> {
    let mut decoded = Record::with_capacity(row.len());
    for (name, value) in row {
        let value = match schema.column_type(&name) {
            Some(column_type) => decode_value(column_type, value).ok_or_else(|| {
                format!("unexpected stored value for {table}.{name} declared as {column_type}")
            })?,
            None => value,
        };
        decoded.insert(name, value);
    }
    Ok(decoded)
}

fn decode_value(column_type: &ColumnType, value: Value) -> Option<Value> {
    match (column_type, value) {
        (_, Value::Null) => Some(Value::Null),
        (ColumnType::Integer, value @ Value::Integer(_)) => Some(value),
        (ColumnType::Float, value @ Value::Float(_)) => Some(value),
        (ColumnType::Float, Value::Integer(value)) => Some(Value::Float(value as f64)),
        (ColumnType::Text | ColumnType::Enumerated(_), value @ Value::Text(_)) => Some(value),
        (ColumnType::Boolean, value @ Value::Boolean(_)) => Some(value),
        (ColumnType::Boolean, Value::Integer(0)) => Some(Value::Boolean(false)),
        (ColumnType::Boolean, Value::Integer(1)) => Some(Value::Boolean(true)),
        (ColumnType::Timestamp, value @ Value::Timestamp(_)) => Some(value),
        (ColumnType::Timestamp, Value::Text(text)) => parse_timestamp(&text).map(Value::Timestamp),
        _ => None,
    }
}
