//! Statement builders for the row-shaped operations.
//!
//! Every function here is pure: it validates identifiers, lays out SQL for
//! the given [`Dialect`] and returns a [`Statement`] whose values travel only
//! as bound parameters. Execution lives in [`Database`](crate::Database).
//!
//! # Usage
//!
//! ```ignore
//! use dbkit::{columns, qb, Dialect};
//!
//! let user = columns! { "id" => 1, "name" => "Ada" };
//! let stmt = qb::insert(Dialect::MySql, "users", &user)?;
//! assert_eq!(stmt.sql(), "INSERT INTO users(id, name) VALUES(:id, :name)");
//!
//! let stmt = qb::update_on_key(Dialect::MySql, "users", &user, "id")?;
//! assert_eq!(stmt.sql(), "UPDATE users SET name = :name WHERE id = :id");
//! ```

mod ddl;
mod read;
mod write;


pub use ddl::{CreateTable, table_exists, truncate};
pub use read::{count_rows, count_rows_on_key, select_column};
pub use write::{delete, insert, insert_many, update_on_key};

use crate::columns::Columns;
use crate::error::DbResult;
use crate::ident::{Ident, IntoIdent};
use crate::sql::SqlBuilder;
use crate::value::Value;

/// Validate every column name of a mapping, keeping order.
fn idents_of(columns: &Columns) -> DbResult<Vec<(Ident, &Value)>> {
    columns
        .iter()
        .map(|(name, value)| Ok((name.into_ident()?, value)))
        .collect()
}

/// Append ` WHERE a = :a AND b = :b`, or nothing for an empty predicate list.
fn push_where_and(b: &mut SqlBuilder, predicates: &[(Ident, &Value)]) {
    if predicates.is_empty() {
        return;
    }
    b.push(" WHERE ");
    b.push_assignments(predicates.iter().map(|(i, v)| (i, *v)), " AND ");
}
