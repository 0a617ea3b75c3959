//! The bundled PostgreSQL handle.

use crate::config::ConnectOptions;
use crate::dialect::Dialect;
use crate::error::{DbError, DbResult};
use crate::handle::Handle;
use crate::row::{Row, from_pg_row};
use crate::sql::Statement;
use tokio::task::JoinHandle;
use tokio_postgres::NoTls;
use tokio_postgres::types::ToSql;

/// A single `tokio-postgres` connection.
///
/// Every statement is prepared server-side before it is executed; values are
/// only ever sent as bind parameters. The connection is released when this
/// value is dropped or [`close`](PgConnection::close)d.
pub struct PgConnection {
    client: tokio_postgres::Client,
    driver: JoinHandle<()>,
}

impl PgConnection {
    /// Open the connection eagerly.
    ///
    /// Must be called from within a Tokio runtime: the connection's I/O runs
    /// on a spawned task.
    pub async fn connect(options: &ConnectOptions) -> DbResult<Self> {
        let (client, connection) = options
            .to_pg_config()
            .connect(NoTls)
            .await
            .map_err(|e| {
                DbError::Connection(format!(
                    "cannot connect to {}:{}/{} as {}: {e}",
                    options.host, options.port, options.database, options.user
                ))
            })?;

        let driver = tokio::spawn(async move {
            if let Err(_e) = connection.await {
                #[cfg(feature = "tracing")]
                tracing::warn!(target: "dbkit", error = %_e, "connection closed with error");
            }
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "dbkit",
            host = %options.host,
            port = options.port,
            database = %options.database,
            "connection opened"
        );

        Ok(Self { client, driver })
    }

    /// Close the connection and wait for its I/O task to finish.
    pub async fn close(self) -> DbResult<()> {
        let Self { client, driver } = self;
        drop(client);
        driver
            .await
            .map_err(|e| DbError::Connection(format!("connection task failed: {e}")))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "dbkit", "connection closed");
        Ok(())
    }

    /// Whether the server side has gone away.
    pub fn is_closed(&self) -> bool {
        self.client.is_closed()
    }

    async fn prepare(&self, stmt: &Statement) -> DbResult<tokio_postgres::Statement> {
        self.client
            .prepare(stmt.sql())
            .await
            .map_err(|e| DbError::prepare(stmt.sql(), e))
    }
}

fn bind_refs(stmt: &Statement) -> Vec<&(dyn ToSql + Sync)> {
    stmt.params()
        .values()
        .into_iter()
        .map(|v| v as &(dyn ToSql + Sync))
        .collect()
}

impl Handle for PgConnection {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn fetch_all(&self, stmt: &Statement) -> DbResult<Vec<Row>> {
        let prepared = self.prepare(stmt).await?;
        let params = bind_refs(stmt);
        let rows = self
            .client
            .query(&prepared, &params)
            .await
            .map_err(DbError::from_db_error)?;
        rows.iter().map(from_pg_row).collect()
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        let prepared = self.prepare(stmt).await?;
        let params = bind_refs(stmt);
        self.client
            .execute(&prepared, &params)
            .await
            .map_err(DbError::from_db_error)
    }
}
