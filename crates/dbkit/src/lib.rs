//! # dbkit
//!
//! Injection-safe CRUD statements over a single database connection.
//!
//! ## Features
//!
//! - **Values are always bound**: table and column names are validated
//!   identifiers, everything else travels as a parameter
//! - **Order-preserving inputs**: [`Columns`] keeps caller order, which is
//!   the order of columns and placeholders in the generated SQL
//! - **Dialects**: `:name` / `?` placeholders for MySQL, `$n` for PostgreSQL
//! - **Normalized rows**: results come back as ordered name → [`Value`] rows
//! - **Safe defaults**: DELETE requires a predicate, UPDATE requires a SET column
//!
//! ## Usage
//!
//! ```ignore
//! use dbkit::{columns, ConnectOptions, CreateTable, Database, RowSet};
//!
//! let db = Database::connect(&ConnectOptions::from_env()?).await?;
//!
//! db.create_table(
//!     &CreateTable::new("users")
//!         .column("id", "BIGINT PRIMARY KEY")
//!         .column("name", "TEXT NOT NULL"),
//! )
//! .await?;
//!
//! db.insert("users", &columns! { "id" => 1, "name" => "Ada" }).await?;
//! db.update_on_key("users", &columns! { "id" => 1, "name" => "Ada L." }, "id").await?;
//!
//! let rows = RowSet::from_rows(["id", "name"], [[2.into(), "Grace".into()]])?;
//! db.insert_many("users", &rows).await?;
//!
//! let n = db.count_rows("users", &columns! {}).await?;
//! ```
//!
//! Statement builders can also be used on their own through [`qb`].

pub mod columns;
pub mod config;
pub mod db;
pub mod dialect;
pub mod error;
pub mod handle;
pub mod ident;
pub mod pg;
pub mod qb;
pub mod row;
pub mod sql;
pub mod value;

#[cfg(feature = "tracing")]
pub mod trace;

pub use columns::{Columns, RowSet};
pub use config::ConnectOptions;
pub use db::Database;
pub use dialect::{DEFAULT_CHARSET, Dialect};
pub use error::{DbError, DbResult};
pub use handle::Handle;
pub use ident::{Ident, IntoIdent};
pub use pg::PgConnection;
pub use qb::CreateTable;
pub use row::{ColumnSet, Row};
pub use sql::{Params, SqlBuilder, Statement, StatementKind, bind_named};
pub use value::Value;

#[cfg(feature = "tracing")]
pub use trace::SqlTracer;
