//! Row normalization: driver rows to ordered name → [`Value`] mappings.

use crate::error::{DbError, DbResult};
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use tokio_postgres::types::{FromSql, Type};

/// One result row: column names with their values, in select-list order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((name.into(), value));
    }

    /// Value of the first column called `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Like [`Row::get`], but a missing column is a decode error.
    pub fn try_get(&self, name: &str) -> DbResult<&Value> {
        self.get(name)
            .ok_or_else(|| DbError::decode(name, "no such column in row"))
    }

    /// Value at a select-list position.
    pub fn get_index(&self, idx: usize) -> Option<&Value> {
        self.entries.get(idx).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Take the first column's value, dropping the rest.
    pub fn into_first(self) -> Option<Value> {
        self.entries.into_iter().next().map(|(_, v)| v)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Distinct values of a single column, for membership tests.
pub type ColumnSet = HashSet<Value>;

/// Project rows to their first column's value, keeping order.
pub fn project_first(rows: Vec<Row>) -> Vec<Value> {
    rows.into_iter().filter_map(Row::into_first).collect()
}

/// Project rows to the set of their first column's values.
pub fn project_set(rows: Vec<Row>) -> ColumnSet {
    rows.into_iter().filter_map(Row::into_first).collect()
}

/// Read a single value from a `COUNT(*)`-shaped row.
pub(crate) fn count_of(rows: Vec<Row>) -> DbResult<i64> {
    let value = rows
        .into_iter()
        .next()
        .and_then(Row::into_first)
        .ok_or_else(|| DbError::decode("nbr", "count query returned no rows"))?;
    match value {
        Value::Int(n) => Ok(n),
        Value::Text(s) => s
            .parse()
            .map_err(|_| DbError::decode("nbr", format!("not a count: {s}"))),
        other => Err(DbError::decode(
            "nbr",
            format!("expected an integer count, got {}", other.type_name()),
        )),
    }
}

/// Normalize a `tokio_postgres` row, decoding each column by its type.
pub fn from_pg_row(row: &tokio_postgres::Row) -> DbResult<Row> {
    let mut out = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_column(row, idx, column.type_())
            .map_err(|message| DbError::decode(column.name(), message))?;
        out.push(column.name(), value);
    }
    Ok(out)
}

fn decode_column(row: &tokio_postgres::Row, idx: usize, ty: &Type) -> Result<Value, String> {
    fn get<'a, T: FromSql<'a>>(row: &'a tokio_postgres::Row, idx: usize) -> Result<Option<T>, String> {
        row.try_get::<_, Option<T>>(idx).map_err(|e| e.to_string())
    }

    let value = if *ty == Type::BOOL {
        get::<bool>(row, idx)?.map(Value::Bool)
    } else if *ty == Type::INT2 {
        get::<i16>(row, idx)?.map(Value::from)
    } else if *ty == Type::INT4 {
        get::<i32>(row, idx)?.map(Value::from)
    } else if *ty == Type::INT8 {
        get::<i64>(row, idx)?.map(Value::Int)
    } else if *ty == Type::OID {
        get::<u32>(row, idx)?.map(Value::from)
    } else if *ty == Type::FLOAT4 {
        get::<f32>(row, idx)?.map(Value::from)
    } else if *ty == Type::FLOAT8 {
        get::<f64>(row, idx)?.map(Value::Float)
    } else if *ty == Type::NUMERIC {
        get::<Decimal>(row, idx)?.map(Value::Decimal)
    } else if *ty == Type::BYTEA {
        get::<Vec<u8>>(row, idx)?.map(Value::Bytes)
    } else if *ty == Type::JSON || *ty == Type::JSONB {
        get::<serde_json::Value>(row, idx)?.map(Value::Json)
    } else if *ty == Type::UUID {
        get::<uuid::Uuid>(row, idx)?.map(Value::Uuid)
    } else if *ty == Type::DATE {
        get::<NaiveDate>(row, idx)?.map(Value::Date)
    } else if *ty == Type::TIMESTAMP {
        get::<NaiveDateTime>(row, idx)?.map(Value::Timestamp)
    } else if *ty == Type::TIMESTAMPTZ {
        get::<DateTime<Utc>>(row, idx)?.map(Value::TimestampTz)
    } else if <String as FromSql<'_>>::accepts(ty) {
        get::<String>(row, idx)?.map(Value::Text)
    } else {
        return Err(format!("unsupported column type {ty}"));
    };
    Ok(value.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entries: &[(&str, Value)]) -> Row {
        entries.iter().cloned().collect()
    }

    #[test]
    fn get_by_name_and_index() {
        let r = row(&[("id", Value::Int(1)), ("name", Value::from("Ada"))]);
        assert_eq!(r.get("name"), Some(&Value::from("Ada")));
        assert_eq!(r.get_index(0), Some(&Value::Int(1)));
        assert!(r.get("missing").is_none());
        assert!(r.try_get("missing").is_err());
    }

    #[test]
    fn projection_keeps_order_and_set_dedups() {
        let rows = vec![
            row(&[("k", Value::from("b"))]),
            row(&[("k", Value::from("a"))]),
            row(&[("k", Value::from("b"))]),
        ];
        assert_eq!(
            project_first(rows.clone()),
            [Value::from("b"), Value::from("a"), Value::from("b")]
        );
        let set = project_set(rows);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Value::from("a")));
    }

    #[test]
    fn count_reads_first_value() {
        assert_eq!(count_of(vec![row(&[("nbr", Value::Int(3))])]).unwrap(), 3);
        assert_eq!(count_of(vec![row(&[("nbr", Value::from("4"))])]).unwrap(), 4);
        assert!(count_of(Vec::new()).is_err());
        assert!(count_of(vec![row(&[("nbr", Value::Null)])]).is_err());
    }
}
