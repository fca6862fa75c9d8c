//! Per-column value validation.

use crate::model::value::{ColumnType, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Candidate value kind does not match the declared column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTypeError {
    pub expected: String,
    pub actual: String,
}

impl Display for ValueTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "value is of type {} and not {}", self.actual, self.expected)
    }
}

impl Error for ValueTypeError {}

/// Validator bound to one declared column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityProperty {
    column_type: ColumnType,
}

impl EntityProperty {
    pub fn new(column_type: ColumnType) -> Self {
        Self { column_type }
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    /// Checks `value` against the declared type and returns the accepted value.
    ///
    /// # Contract
    /// - `Null` is accepted for every type.
    /// - `Integer` is widened to `Float` for float columns; no other coercion.
    /// - Enumerated columns accept only `Text` naming a declared variant.
    pub fn validate_value(&self, value: Value) -> Result<Value, ValueTypeError> {
        match (&self.column_type, value) {
            (_, Value::Null) => Ok(Value::Null),
            (ColumnType::Integer, value @ Value::Integer(_)) => Ok(value),
            (ColumnType::Float, value @ Value::Float(_)) => Ok(value),
            (ColumnType::Float, Value::Integer(number)) => Ok(Value::Float(number as f64)),
            (ColumnType::Text, value @ Value::Text(_)) => Ok(value),
            (ColumnType::Boolean, value @ Value::Boolean(_)) => Ok(value),
            (ColumnType::Timestamp, value @ Value::Timestamp(_)) => Ok(value),
            (ColumnType::Enumerated(variants), Value::Text(text))
                if variants.iter().any(|variant| *variant == text) =>
            {
                Ok(Value::Text(text))
            }
            (ColumnType::Enumerated(_), Value::Text(text)) => Err(ValueTypeError {
                expected: self.column_type.type_name(),
                actual: format!("string `{text}`"),
            }),
            (expected, other) => Err(ValueTypeError {
                expected: expected.type_name(),
                actual: other.type_name().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EntityProperty;
    use crate::model::value::{ColumnType, Value};

    #[test]
    fn accepts_matching_kind_and_null() {
        let property = EntityProperty::new(ColumnType::Text);
        assert_eq!(
            property.validate_value(Value::from("Ford")).unwrap(),
            Value::from("Ford")
        );
        assert_eq!(property.validate_value(Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn rejects_string_for_integer_column() {
        let property = EntityProperty::new(ColumnType::Integer);
        let err = property.validate_value(Value::from("120")).unwrap_err();
        assert_eq!(err.expected, "integer");
        assert_eq!(err.actual, "string");
    }

    #[test]
    fn widens_integer_for_float_column_only() {
        let float = EntityProperty::new(ColumnType::Float);
        assert_eq!(float.validate_value(Value::from(3)).unwrap(), Value::Float(3.0));

        let integer = EntityProperty::new(ColumnType::Integer);
        assert!(integer.validate_value(Value::Float(3.0)).is_err());
    }

    #[test]
    fn boolean_column_rejects_integer() {
        let property = EntityProperty::new(ColumnType::Boolean);
        let err = property.validate_value(Value::from(1)).unwrap_err();
        assert_eq!(err.expected, "boolean");
        assert_eq!(err.actual, "integer");
    }

    #[test]
    fn enumerated_column_checks_membership() {
        let property = EntityProperty::new(ColumnType::enumerated(["petrol", "diesel"]));
        assert!(property.validate_value(Value::from("diesel")).is_ok());

        let err = property.validate_value(Value::from("steam")).unwrap_err();
        assert_eq!(err.expected, "enum(petrol|diesel)");
        assert_eq!(err.actual, "string `steam`");
    }
}
