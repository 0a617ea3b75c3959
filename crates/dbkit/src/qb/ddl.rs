use crate::dialect::{DEFAULT_CHARSET, Dialect};
use crate::error::{DbError, DbResult};
use crate::ident::{Ident, IntoIdent};
use crate::sql::{SqlBuilder, Statement, StatementKind};
use crate::value::Value;

/// Count the catalog entries for `table` in `information_schema.tables`.
///
/// A schema-qualified name (`shop.users`) filters on that schema; otherwise
/// the connection's current schema/database is used. On Postgres unquoted
/// parts are folded to lower case, the way the server stores them. The single
/// result column is named `nbr`.
pub fn table_exists(dialect: Dialect, table: impl IntoIdent) -> DbResult<Statement> {
    let table = table.into_ident()?;
    // Catalog columns are `sql_identifier` on Postgres; compare as text so the
    // bind parameter is typed `text`.
    let cast = match dialect {
        Dialect::MySql => "",
        Dialect::Postgres => "::text",
    };
    let name = table
        .name_part()
        .map(|p| p.catalog_name(dialect))
        .unwrap_or_default();
    let mut b = SqlBuilder::new(dialect, StatementKind::Select);
    b.push("SELECT COUNT(*) AS nbr FROM information_schema.tables WHERE table_name")
        .push(cast)
        .push(" = ")
        .push_named("table_name", Value::from(name))
        .push(" AND table_schema");
    match table.schema_part() {
        Some(schema) => {
            b.push(cast)
                .push(" = ")
                .push_named("table_schema", Value::from(schema.catalog_name(dialect)));
        }
        None => {
            b.push(" = ").push(match dialect {
                Dialect::MySql => "DATABASE()",
                Dialect::Postgres => "current_schema()",
            });
        }
    }
    b.finish()
}

/// `TRUNCATE TABLE table`, no parameters.
pub fn truncate(dialect: Dialect, table: impl IntoIdent) -> DbResult<Statement> {
    let mut b = SqlBuilder::new(dialect, StatementKind::Truncate);
    b.push("TRUNCATE TABLE ").push_ident(table)?;
    b.finish()
}

/// A `CREATE TABLE` description.
///
/// Column definitions and constraints are trusted DDL text and are emitted
/// verbatim, in the order they were added.
///
/// ```ignore
/// let spec = CreateTable::new("orders")
///     .column("id", "INT PRIMARY KEY")
///     .column("user_id", "INT NOT NULL")
///     .constraint("FOREIGN KEY (user_id) REFERENCES users(id)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    table: String,
    columns: Vec<(String, String)>,
    constraints: Vec<String>,
    encoding: Option<String>,
}

impl CreateTable {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
            encoding: None,
        }
    }

    /// Add a column with its type definition (`"INT NOT NULL"`).
    pub fn column(mut self, name: impl Into<String>, definition: impl Into<String>) -> Self {
        self.columns.push((name.into(), definition.into()));
        self
    }

    /// Add a table constraint (`"PRIMARY KEY (id)"`, foreign keys, ...).
    pub fn constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    /// Add several table constraints.
    pub fn constraints<I, S>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints
            .extend(constraints.into_iter().map(Into::into));
        self
    }

    /// Character set of the table. Defaults to [`DEFAULT_CHARSET`].
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Render `CREATE TABLE name (defs[, constraints]) CHARACTER SET enc`.
    pub fn build(&self, dialect: Dialect) -> DbResult<Statement> {
        if self.columns.is_empty() {
            return Err(DbError::validation(format!(
                "CREATE TABLE {} needs at least one column",
                self.table
            )));
        }

        let mut b = SqlBuilder::new(dialect, StatementKind::Create);
        b.push("CREATE TABLE ").push_ident(self.table.as_str())?;
        b.push(" (");
        for (i, (name, definition)) in self.columns.iter().enumerate() {
            if definition.trim().is_empty() {
                return Err(DbError::validation(format!(
                    "column {name} has an empty definition"
                )));
            }
            if i > 0 {
                b.push(", ");
            }
            b.push_ident(name)?;
            b.push(" ").push(definition);
        }
        for constraint in self.constraints.iter().filter(|c| !c.trim().is_empty()) {
            b.push(", ").push(constraint);
        }
        b.push(")");

        if dialect.supports_table_charset() {
            let encoding: Ident = self
                .encoding
                .as_deref()
                .filter(|e| !e.is_empty())
                .unwrap_or(DEFAULT_CHARSET)
                .into_ident()?;
            b.push(" CHARACTER SET ").push_ident_ref(&encoding);
        }
        b.finish()
    }
}
