use super::{idents_of, push_where_and};
use crate::columns::{Columns, RowSet};
use crate::dialect::Dialect;
use crate::error::{DbError, DbResult};
use crate::ident::{Ident, IntoIdent};
use crate::sql::{SqlBuilder, Statement, StatementKind};

/// `INSERT INTO table(a, b) VALUES(:a, :b)`.
///
/// Column list and placeholder list follow the mapping's order. Placeholders
/// are named after their column; colliding names get a numeric suffix.
pub fn insert(dialect: Dialect, table: impl IntoIdent, data: &Columns) -> DbResult<Statement> {
    if data.is_empty() {
        return Err(DbError::validation("INSERT requires at least one column"));
    }
    let cols = idents_of(data)?;

    let mut b = SqlBuilder::new(dialect, StatementKind::Insert);
    b.push("INSERT INTO ").push_ident(table)?;
    b.push("(")
        .push_ident_list(cols.iter().map(|(i, _)| i))
        .push(") VALUES(");
    for (i, (ident, value)) in cols.iter().enumerate() {
        if i > 0 {
            b.push(", ");
        }
        b.push_column_bind(ident, (*value).clone());
    }
    b.push(")");
    b.finish()
}

/// One multi-row insert for the whole row-set, with positional placeholders:
/// `INSERT IGNORE INTO table(a, b) VALUES(?, ?), (?, ?)`.
///
/// Values are bound in row-major order. Rows that collide with a unique key
/// are skipped by the server (`INSERT IGNORE` / `ON CONFLICT DO NOTHING`).
/// Returns `Ok(None)` when the row-set has no data rows.
pub fn insert_many(
    dialect: Dialect,
    table: impl IntoIdent,
    rows: &RowSet,
) -> DbResult<Option<Statement>> {
    if rows.width() == 0 {
        return Err(DbError::validation(
            "multi-row INSERT requires at least one column",
        ));
    }
    let header = rows
        .header()
        .iter()
        .map(IntoIdent::into_ident)
        .collect::<DbResult<Vec<Ident>>>()?;
    let table = table.into_ident()?;
    if rows.is_empty() {
        return Ok(None);
    }

    let mut b = SqlBuilder::new(dialect, StatementKind::Insert);
    b.push(match dialect {
        Dialect::MySql => "INSERT IGNORE INTO ",
        Dialect::Postgres => "INSERT INTO ",
    });
    b.push_ident_ref(&table)
        .push("(")
        .push_ident_list(&header)
        .push(") VALUES");
    for (r, row) in rows.rows().iter().enumerate() {
        if row.len() != header.len() {
            return Err(DbError::validation(format!(
                "row {} has {} values but the header has {} columns",
                r + 1,
                row.len(),
                header.len()
            )));
        }
        b.push(if r > 0 { ", (" } else { "(" });
        for (c, value) in row.iter().enumerate() {
            if c > 0 {
                b.push(", ");
            }
            b.push_positional(value.clone());
        }
        b.push(")");
    }
    if dialect == Dialect::Postgres {
        b.push(" ON CONFLICT DO NOTHING");
    }
    b.finish().map(Some)
}

/// `UPDATE table SET a = :a, ... WHERE key = :key`.
///
/// `where_key` is left out of the SET list wherever it sits in `data`, and its
/// value must be present in `data`. A mapping holding nothing but the key is
/// rejected rather than rendered with an empty SET clause. A SET column whose
/// placeholder name collides with the key's (`t.id` next to `id`) pushes the
/// key's placeholder to `:id_2`.
pub fn update_on_key(
    dialect: Dialect,
    table: impl IntoIdent,
    data: &Columns,
    where_key: &str,
) -> DbResult<Statement> {
    let key = where_key.into_ident()?;
    let cols = idents_of(data)?;

    let key_value = cols
        .iter()
        .find(|(ident, _)| *ident == key)
        .map(|(_, v)| *v)
        .ok_or_else(|| {
            DbError::validation(format!("UPDATE where-key {where_key} has no value"))
        })?;
    let sets: Vec<_> = cols
        .iter()
        .filter(|(ident, _)| *ident != key)
        .map(|(i, v)| (i, *v))
        .collect();
    if sets.is_empty() {
        return Err(DbError::validation(format!(
            "UPDATE requires at least one column besides the where-key {where_key}"
        )));
    }

    let mut b = SqlBuilder::new(dialect, StatementKind::Update);
    b.push("UPDATE ").push_ident(table)?;
    b.push(" SET ").push_assignments(sets, ", ");
    b.push(" WHERE ")
        .push_assignments([(&key, key_value)], " AND ");
    b.finish()
}

/// `DELETE FROM table WHERE a = :a AND ...`.
///
/// At least one predicate is required.
pub fn delete(dialect: Dialect, table: impl IntoIdent, predicates: &Columns) -> DbResult<Statement> {
    if predicates.is_empty() {
        return Err(DbError::validation(
            "DELETE requires at least one predicate",
        ));
    }
    let predicates = idents_of(predicates)?;
    let mut b = SqlBuilder::new(dialect, StatementKind::Delete);
    b.push("DELETE FROM ").push_ident(table)?;
    push_where_and(&mut b, &predicates);
    b.finish()
}
