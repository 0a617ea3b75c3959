//! The connection seam statements are executed through.

use crate::dialect::Dialect;
use crate::error::DbResult;
use crate::row::Row;
use crate::sql::Statement;

/// A live database connection able to run rendered [`Statement`]s.
///
/// Each call is one prepare + execute round trip. Implementations must
/// bind `stmt.params()` as parameters; the SQL text already carries the
/// placeholders for [`Handle::dialect`].
///
/// [`PgConnection`](crate::PgConnection) is the bundled implementation; tests
/// and other drivers can provide their own.
pub trait Handle: Send + Sync {
    /// The dialect statements for this handle must be rendered in.
    fn dialect(&self) -> Dialect;

    /// Execute a statement and return every row, fully drained.
    fn fetch_all(
        &self,
        stmt: &Statement,
    ) -> impl std::future::Future<Output = DbResult<Vec<Row>>> + Send;

    /// Execute a statement, discard any rows, and return the affected row count.
    fn execute(&self, stmt: &Statement) -> impl std::future::Future<Output = DbResult<u64>> + Send;
}
