//! Parameter-safe SQL composition.
//!
//! - [`SqlBuilder`] composes statements from trusted text, validated
//!   identifiers and bound values, rendering placeholders for a [`Dialect`].
//! - [`bind_named`] takes caller SQL already written with `:name`
//!   placeholders and binds it against a [`Columns`] mapping.
//!
//! # Example
//!
//! ```ignore
//! use dbkit::{Dialect, SqlBuilder, StatementKind};
//!
//! let mut b = SqlBuilder::new(Dialect::MySql, StatementKind::Select);
//! b.push("SELECT * FROM ").push_ident("users")?;
//! b.push(" WHERE id = ").push_named("id", 1.into());
//! let stmt = b.finish()?;
//! assert_eq!(stmt.sql(), "SELECT * FROM users WHERE id = :id");
//! ```
//!
//! [`Dialect`]: crate::Dialect
//! [`Columns`]: crate::Columns

mod builder;
mod named;
mod statement;


pub use builder::SqlBuilder;
pub use named::bind_named;
pub use statement::{Params, Statement, StatementKind};
