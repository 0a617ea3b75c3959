//! SQL dialects statements can be rendered for.

use serde::Deserialize;

/// Character set appended to `CREATE TABLE` when the caller gives none.
pub const DEFAULT_CHARSET: &str = "utf8mb4";

/// The SQL flavor a [`Statement`](crate::Statement) is rendered in.
///
/// | | `MySql` | `Postgres` |
/// |---|---|---|
/// | named bind | `:name` | `$n` |
/// | positional bind | `?` | `$n` |
/// | quoted identifier | `` `a` `` | `"a"` |
/// | skip duplicate rows | `INSERT IGNORE INTO` | `ON CONFLICT DO NOTHING` |
/// | table encoding | `CHARACTER SET enc` | omitted |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    #[default]
    MySql,
    Postgres,
}

impl Dialect {
    /// Quote character used for quoted identifier parts.
    pub fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Postgres => '"',
        }
    }

    /// Whether bind slots are numbered (`$1, $2, ...`) rather than named/`?`.
    pub fn numbered_placeholders(self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    /// Whether `CREATE TABLE` accepts a trailing `CHARACTER SET` clause.
    pub fn supports_table_charset(self) -> bool {
        matches!(self, Dialect::MySql)
    }
}
