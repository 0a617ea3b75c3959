use crate::value::Value;

/// The kind of SQL operation a statement performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// SELECT query
    Select,
    /// INSERT statement (single or multi-row)
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// CREATE TABLE
    Create,
    /// TRUNCATE TABLE
    Truncate,
    /// Anything else (other DDL, custom)
    Other,
}

impl StatementKind {
    /// Detect the statement kind from SQL text.
    pub fn from_sql(sql: &str) -> Self {
        fn strip_sql_prefix(sql: &str) -> &str {
            let mut s = sql;
            loop {
                let before = s;
                s = s.trim_start();
                if s.starts_with("--") {
                    if let Some(pos) = s.find('\n') {
                        s = &s[pos + 1..];
                        continue;
                    }
                    return "";
                }
                if s.starts_with("/*") {
                    if let Some(pos) = s.find("*/") {
                        s = &s[pos + 2..];
                        continue;
                    }
                    return "";
                }
                if let Some(rest) = s.strip_prefix('(') {
                    s = rest;
                    continue;
                }
                if s == before {
                    break;
                }
            }
            s
        }

        fn starts_with_keyword(s: &str, keyword: &str) -> bool {
            match s.get(0..keyword.len()) {
                Some(prefix) => prefix.eq_ignore_ascii_case(keyword),
                None => false,
            }
        }

        let trimmed = strip_sql_prefix(sql);
        if starts_with_keyword(trimmed, "SELECT") || starts_with_keyword(trimmed, "WITH") {
            StatementKind::Select
        } else if starts_with_keyword(trimmed, "INSERT") {
            StatementKind::Insert
        } else if starts_with_keyword(trimmed, "UPDATE") {
            StatementKind::Update
        } else if starts_with_keyword(trimmed, "DELETE") {
            StatementKind::Delete
        } else if starts_with_keyword(trimmed, "CREATE") {
            StatementKind::Create
        } else if starts_with_keyword(trimmed, "TRUNCATE") {
            StatementKind::Truncate
        } else {
            StatementKind::Other
        }
    }
}

/// Bound parameters of a statement.
///
/// Values are stored in placeholder order, so drivers with numbered or `?`
/// placeholders can bind them positionally; named entries additionally carry
/// the placeholder name (without the leading `:`).
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    Named(Vec<(String, Value)>),
    Positional(Vec<Value>),
}

impl Default for Params {
    fn default() -> Self {
        Params::Named(Vec::new())
    }
}

impl Params {
    pub fn len(&self) -> usize {
        match self {
            Params::Named(v) => v.len(),
            Params::Positional(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values in placeholder order.
    pub fn values(&self) -> Vec<&Value> {
        match self {
            Params::Named(v) => v.iter().map(|(_, v)| v).collect(),
            Params::Positional(v) => v.iter().collect(),
        }
    }

    /// Look up a named parameter. Always `None` for positional params.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Params::Named(v) => v.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            Params::Positional(_) => None,
        }
    }
}

/// Rendered SQL text plus its bound parameters, ready for a
/// [`Handle`](crate::Handle).
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub(crate) kind: StatementKind,
    pub(crate) sql: String,
    pub(crate) params: Params,
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn into_parts(self) -> (String, Params) {
        (self.sql, self.params)
    }
}
