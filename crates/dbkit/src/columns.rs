//! Ordered column mappings and bulk row-sets.

use crate::error::{DbError, DbResult};
use crate::value::Value;

/// An ordered mapping of column name to [`Value`].
///
/// Insertion order is the order columns and placeholders appear in generated
/// SQL. Setting a name that is already present replaces its value in place.
///
/// ```ignore
/// let user = Columns::new().with("id", 1).with("name", "Ada");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns {
    entries: Vec<(String, Value)>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value (consuming version of [`Columns::set`]).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Columns {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut cols = Columns::new();
        for (k, v) in iter {
            cols.set(k, v);
        }
        cols
    }
}

impl IntoIterator for Columns {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Build a [`Columns`] mapping in literal order.
///
/// ```ignore
/// let user = dbkit::columns! { "id" => 1, "name" => "Ada" };
/// ```
#[macro_export]
macro_rules! columns {
    () => { $crate::Columns::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {
        $crate::Columns::new()$(.with($name, $value))+
    };
}

/// A header of column names plus rows of values aligned to it, used for
/// multi-row inserts.
///
/// Every row has exactly as many values as the header has names; the
/// constructors reject anything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    header: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    /// Start an empty row-set with the given column names.
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a row-set from a header and rows at once.
    pub fn from_rows<I, S, R, V>(header: I, rows: R) -> DbResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut set = Self::new(header);
        for row in rows {
            set.push_row(row)?;
        }
        Ok(set)
    }

    /// Build a row-set from a table whose first row holds the column names.
    ///
    /// The header row must contain only text values.
    pub fn from_table(table: Vec<Vec<Value>>) -> DbResult<Self> {
        let mut iter = table.into_iter();
        let header = iter
            .next()
            .ok_or_else(|| DbError::validation("row-set table has no header row"))?;
        let header = header
            .into_iter()
            .enumerate()
            .map(|(i, v)| match v {
                Value::Text(s) => Ok(s),
                other => Err(DbError::validation(format!(
                    "row-set header entry {i} must be a column name, got {}",
                    other.type_name()
                ))),
            })
            .collect::<DbResult<Vec<_>>>()?;
        Self::from_rows(header, iter)
    }

    /// Append a row, checking its arity against the header.
    pub fn push_row<R, V>(&mut self, row: R) -> DbResult<&mut Self>
    where
        R: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let row: Vec<Value> = row.into_iter().map(Into::into).collect();
        if row.len() != self.header.len() {
            return Err(DbError::validation(format!(
                "row {} has {} values but the header has {} columns",
                self.rows.len() + 1,
                row.len(),
                self.header.len()
            )));
        }
        self.rows.push(row);
        Ok(self)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns per row.
    pub fn width(&self) -> usize {
        self.header.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let mut cols = Columns::new().with("a", 1).with("b", 2);
        cols.set("a", 10);
        let names: Vec<_> = cols.names().collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(cols.get("a"), Some(&Value::Int(10)));
        assert_eq!(cols.len(), 2);
    }

    #[test]
    fn columns_macro_keeps_order() {
        let cols = crate::columns! { "z" => 1, "a" => "x", "m" => None::<i64> };
        let names: Vec<_> = cols.names().collect();
        assert_eq!(names, ["z", "a", "m"]);
        assert!(cols.get("m").unwrap().is_null());
    }

    #[test]
    fn row_set_rejects_arity_mismatch() {
        let mut set = RowSet::new(["a", "b"]);
        set.push_row([Value::from(1), Value::from("x")]).unwrap();
        let err = set.push_row([Value::from(2)]).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn row_set_from_table_splits_header() {
        let set = RowSet::from_table(vec![
            vec!["a".into(), "b".into()],
            vec![1.into(), "x".into()],
            vec![2.into(), "y".into()],
        ])
        .unwrap();
        assert_eq!(set.header(), ["a", "b"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.width(), 2);
    }

    #[test]
    fn row_set_from_table_needs_text_header() {
        assert!(RowSet::from_table(vec![vec![1.into()]]).is_err());
        assert!(RowSet::from_table(Vec::new()).is_err());
    }
}
