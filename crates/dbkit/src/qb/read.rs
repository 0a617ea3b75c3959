use super::{idents_of, push_where_and};
use crate::columns::Columns;
use crate::dialect::Dialect;
use crate::error::DbResult;
use crate::ident::IntoIdent;
use crate::sql::{SqlBuilder, Statement, StatementKind};

/// `SELECT COUNT(*) AS nbr FROM table WHERE a = :a AND ...`.
///
/// An empty predicate mapping counts every row: no `WHERE` is emitted.
pub fn count_rows(
    dialect: Dialect,
    table: impl IntoIdent,
    predicates: &Columns,
) -> DbResult<Statement> {
    let predicates = idents_of(predicates)?;
    let mut b = SqlBuilder::new(dialect, StatementKind::Select);
    b.push("SELECT COUNT(*) AS nbr FROM ").push_ident(table)?;
    push_where_and(&mut b, &predicates);
    b.finish()
}

/// Count rows matching `where_key` only.
///
/// When `data` has no value for `where_key`, or the value is null, every row
/// is counted; other entries of `data` are ignored.
pub fn count_rows_on_key(
    dialect: Dialect,
    table: impl IntoIdent,
    data: &Columns,
    where_key: &str,
) -> DbResult<Statement> {
    let predicates: Columns = data
        .get(where_key)
        .filter(|v| !v.is_null())
        .map(|v| (where_key, v.clone()))
        .into_iter()
        .collect();
    count_rows(dialect, table, &predicates)
}

/// `SELECT column FROM table`.
pub fn select_column(
    dialect: Dialect,
    table: impl IntoIdent,
    column: impl IntoIdent,
) -> DbResult<Statement> {
    let mut b = SqlBuilder::new(dialect, StatementKind::Select);
    b.push("SELECT ").push_ident(column)?;
    b.push(" FROM ").push_ident(table)?;
    b.finish()
}
