//! Statement execution seam between tables and the connection.
//!
//! # Responsibility
//! - Prepare SQL text, bind named parameters and run it.
//! - Return rows as ordered records in storage form.
//!
//! # Invariants
//! - Binding keys are column names without the leading `:`.
//! - Returned values are only `Null`, `Integer`, `Float` or `Text`.
//! - One statement per call; nothing is cached or retried.

use crate::db::{DbError, DbResult};
use crate::model::record::Record;
use crate::model::value::Value;
use crate::table::codec::encode_value;
use rusqlite::types::{ToSql, Value as SqlValue};
use rusqlite::Connection;

/// Connection capability used by tables.
///
/// Callers sharing one executor across threads must serialize access
/// themselves; at most one statement is expected in flight per handle.
pub trait StatementExecutor {
    /// Runs a row-returning statement.
    fn fetch(&self, sql: &str, params: &Record) -> DbResult<Vec<Record>>;
    /// Runs a mutation and returns the affected row count.
    fn execute_named(&self, sql: &str, params: &Record) -> DbResult<usize>;
}

impl StatementExecutor for Connection {
    fn fetch(&self, sql: &str, params: &Record) -> DbResult<Vec<Record>> {
        let mut stmt = self.prepare(sql)?;
        let column_names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let bindings = named_bindings(params);
        let mut rows = stmt.query(binding_refs(&bindings).as_slice())?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            let mut record = Record::with_capacity(column_names.len());
            for (index, name) in column_names.iter().enumerate() {
                let value = match row.get::<_, SqlValue>(index)? {
                    SqlValue::Null => Value::Null,
                    SqlValue::Integer(value) => Value::Integer(value),
                    SqlValue::Real(value) => Value::Float(value),
                    SqlValue::Text(value) => Value::Text(value),
                    SqlValue::Blob(_) => {
                        return Err(DbError::UnsupportedValue {
                            column: name.clone(),
                            kind: "blob",
                        });
                    }
                };
                record.insert(name.as_str(), value);
            }
            records.push(record);
        }

        Ok(records)
    }

    fn execute_named(&self, sql: &str, params: &Record) -> DbResult<usize> {
        let mut stmt = self.prepare(sql)?;
        let bindings = named_bindings(params);
        let changed = stmt.execute(binding_refs(&bindings).as_slice())?;
        Ok(changed)
    }
}

fn named_bindings(params: &Record) -> Vec<(String, SqlValue)> {
    params
        .iter()
        .map(|(name, value)| (format!(":{name}"), encode_value(value)))
        .collect()
}

fn binding_refs(bindings: &[(String, SqlValue)]) -> Vec<(&str, &dyn ToSql)> {
    bindings
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::StatementExecutor;
    use crate::db::{open_db_in_memory, DbError};
    use crate::model::record::Record;
    use crate::model::value::Value;

    #[test]
    fn query_binds_named_parameters_and_keeps_column_order() {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT, score REAL);
             INSERT INTO t (name, score) VALUES ('a', 1.5), ('b', 2.0);",
        )
        .unwrap();

        let params: Record = [("name", "b")].into_iter().collect();
        let rows = conn
            .fetch("SELECT * FROM `t` WHERE `name` = :name;", &params)
            .unwrap();

        assert_eq!(rows.len(), 1);
        let keys: Vec<&str> = rows[0].keys().collect();
        assert_eq!(keys, vec!["id", "name", "score"]);
        assert_eq!(rows[0].get("score"), Some(&Value::Float(2.0)));
    }

    #[test]
    fn query_rejects_blob_values() {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (data BLOB); INSERT INTO t VALUES (x'00ff');")
            .unwrap();

        let err = conn.fetch("SELECT * FROM t;", &Record::new()).unwrap_err();
        assert!(matches!(err, DbError::UnsupportedValue { ref column, .. } if column == "data"));
    }

    #[test]
    fn execute_reports_affected_rows() {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, flag INTEGER);
             INSERT INTO t (flag) VALUES (0), (0);",
        )
        .unwrap();

        let params: Record = [("flag", Value::Boolean(true))].into_iter().collect();
        let changed = conn
            .execute_named("UPDATE t SET flag = :flag;", &params)
            .unwrap();
        assert_eq!(changed, 2);
    }
}
