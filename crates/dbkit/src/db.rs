//! The executor: one handle, every row-shaped operation.

use crate::columns::{Columns, RowSet};
use crate::config::ConnectOptions;
use crate::dialect::Dialect;
use crate::error::DbResult;
use crate::handle::Handle;
use crate::pg::PgConnection;
use crate::qb::{self, CreateTable};
use crate::row::{self, ColumnSet, Row};
use crate::sql::{Statement, bind_named};
use crate::value::Value;

#[cfg(feature = "tracing")]
use crate::trace::SqlTracer;

/// Builds statements for its handle's dialect and runs them, one round trip
/// per call.
///
/// The handle is owned for the lifetime of the `Database` and released when it
/// is dropped (or via [`Database::close`]). Failures are returned to the
/// caller as they happen; nothing is retried.
///
/// # Example
///
/// ```ignore
/// use dbkit::{columns, ConnectOptions, Database};
///
/// let db = Database::connect(&ConnectOptions::from_env()?).await?;
/// db.insert("users", &columns! { "id" => 1, "name" => "Ada" }).await?;
/// assert!(db.key_exists("users", &columns! { "id" => 1 }).await?);
/// db.delete("users", &columns! { "id" => 1 }).await?;
/// db.close().await?;
/// ```
pub struct Database<H = PgConnection> {
    handle: H,
    #[cfg(feature = "tracing")]
    tracer: SqlTracer,
}

impl Database<PgConnection> {
    /// Open a PostgreSQL connection.
    pub async fn connect(options: &ConnectOptions) -> DbResult<Self> {
        Ok(Self::new(PgConnection::connect(options).await?))
    }

    /// Close the connection, waiting for it to shut down.
    pub async fn close(self) -> DbResult<()> {
        self.handle.close().await
    }
}

impl<H: Handle> Database<H> {
    /// Wrap an already-open handle.
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            #[cfg(feature = "tracing")]
            tracer: SqlTracer::default(),
        }
    }

    /// Replace the statement tracer.
    #[cfg(feature = "tracing")]
    pub fn with_tracer(mut self, tracer: SqlTracer) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Give the handle back, ending this `Database`.
    pub fn into_handle(self) -> H {
        self.handle
    }

    pub fn dialect(&self) -> Dialect {
        self.handle.dialect()
    }

    /// Run a prebuilt statement and return its rows.
    pub async fn fetch(&self, stmt: &Statement) -> DbResult<Vec<Row>> {
        #[cfg(feature = "tracing")]
        self.tracer.emit(stmt);
        self.handle.fetch_all(stmt).await
    }

    /// Run a prebuilt statement and return the affected row count.
    pub async fn run(&self, stmt: &Statement) -> DbResult<u64> {
        #[cfg(feature = "tracing")]
        self.tracer.emit(stmt);
        self.handle.execute(stmt).await
    }

    /// Run SQL written with `:name` placeholders and return every row.
    pub async fn query(&self, sql: &str, params: &Columns) -> DbResult<Vec<Row>> {
        let stmt = bind_named(self.dialect(), sql, params)?;
        self.fetch(&stmt).await
    }

    /// Run SQL written with `:name` placeholders, discarding rows.
    pub async fn query_no_fetch(&self, sql: &str, params: &Columns) -> DbResult<u64> {
        let stmt = bind_named(self.dialect(), sql, params)?;
        self.run(&stmt).await
    }

    /// Whether `table` is listed in the schema catalog.
    pub async fn table_exists(&self, table: &str) -> DbResult<bool> {
        let stmt = qb::table_exists(self.dialect(), table)?;
        Ok(row::count_of(self.fetch(&stmt).await?)? > 0)
    }

    /// Create a table unless it already exists.
    ///
    /// Returns `false`, without issuing any DDL, when the table is already
    /// there.
    pub async fn create_table(&self, spec: &CreateTable) -> DbResult<bool> {
        let stmt = spec.build(self.dialect())?;
        if self.table_exists(spec.table()).await? {
            return Ok(false);
        }
        self.run(&stmt).await?;
        Ok(true)
    }

    /// Every value of `column`, in row order.
    pub async fn retrieve_column(&self, table: &str, column: &str) -> DbResult<Vec<Value>> {
        let stmt = qb::select_column(self.dialect(), table, column)?;
        Ok(row::project_first(self.fetch(&stmt).await?))
    }

    /// The distinct values of `column`, for membership tests.
    pub async fn retrieve_column_set(&self, table: &str, column: &str) -> DbResult<ColumnSet> {
        let stmt = qb::select_column(self.dialect(), table, column)?;
        Ok(row::project_set(self.fetch(&stmt).await?))
    }

    /// Insert one row.
    pub async fn insert(&self, table: &str, data: &Columns) -> DbResult<u64> {
        let stmt = qb::insert(self.dialect(), table, data)?;
        self.run(&stmt).await
    }

    /// Insert every row of `rows` in one statement, skipping rows that collide
    /// with a unique key. Returns the number of rows actually inserted.
    pub async fn insert_many(&self, table: &str, rows: &RowSet) -> DbResult<u64> {
        match qb::insert_many(self.dialect(), table, rows)? {
            Some(stmt) => self.run(&stmt).await,
            None => Ok(0),
        }
    }

    /// Update the rows whose `where_key` equals `data[where_key]`, setting every
    /// other column of `data`.
    pub async fn update_on_key(&self, table: &str, data: &Columns, where_key: &str) -> DbResult<u64> {
        let stmt = qb::update_on_key(self.dialect(), table, data, where_key)?;
        self.run(&stmt).await
    }

    /// Remove every row from `table`.
    pub async fn truncate(&self, table: &str) -> DbResult<()> {
        let stmt = qb::truncate(self.dialect(), table)?;
        self.run(&stmt).await?;
        Ok(())
    }

    /// Whether at least one row matches all `predicates`.
    pub async fn key_exists(&self, table: &str, predicates: &Columns) -> DbResult<bool> {
        Ok(self.count_rows(table, predicates).await? > 0)
    }

    /// Number of rows matching all `predicates` (all rows when empty).
    pub async fn count_rows(&self, table: &str, predicates: &Columns) -> DbResult<i64> {
        let stmt = qb::count_rows(self.dialect(), table, predicates)?;
        row::count_of(self.fetch(&stmt).await?)
    }

    /// Number of rows whose `where_key` equals `data[where_key]`, or all rows
    /// when `data` has no such entry.
    pub async fn count_rows_on_key(
        &self,
        table: &str,
        data: &Columns,
        where_key: &str,
    ) -> DbResult<i64> {
        let stmt = qb::count_rows_on_key(self.dialect(), table, data, where_key)?;
        row::count_of(self.fetch(&stmt).await?)
    }

    /// Delete the rows matching all `predicates`.
    pub async fn delete(&self, table: &str, predicates: &Columns) -> DbResult<u64> {
        let stmt = qb::delete(self.dialect(), table, predicates)?;
        self.run(&stmt).await
    }
}
