//! # BarberPro DB
//!
//! Direct PostgreSQL connection used by the migrator when a connection string
//! is available. Statements run through [`sqlx::raw_sql`] so multi-statement
//! bodies and `DO $$ ... $$` blocks go through unchanged, without needing the
//! `exec_sql` function to be installed first.
//!
//! # Example
//!
//! ```ignore
//! use barberpro_db::PgExecutor;
//!
//! let executor = PgExecutor::connect(&database_url).await?;
//! executor.execute_sql("CREATE TABLE IF NOT EXISTS ...").await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use tracing::debug;

use barberpro_backend::{BackendError, SqlExecutor};

pub use sqlx::PgPool;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// [`SqlExecutor`] over a pooled Postgres connection.
#[derive(Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub async fn connect(database_url: &str) -> Result<Self, BackendError> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SqlExecutor for PgExecutor {
    async fn execute_sql(&self, sql: &str) -> Result<(), BackendError> {
        let result = sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!(rows_affected = result.rows_affected(), "statement executed");
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "direct connection"
    }
}

/// Maps driver errors onto the backend's error model so the migrator can
/// classify them by SQLSTATE exactly as it does RPC responses.
pub fn map_sqlx_error(err: sqlx::Error) -> BackendError {
    match err {
        sqlx::Error::Database(db) => {
            let code = db.code().map(|c| c.into_owned());
            BackendError::api(400, code.as_deref(), db.message())
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => BackendError::Unavailable(err.to_string()),
        other => BackendError::Decode(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barberpro_backend::ErrorKind;

    #[test]
    fn test_pool_timeout_is_transient() {
        assert_eq!(map_sqlx_error(sqlx::Error::PoolTimedOut).kind(), ErrorKind::Transient);
    }

    #[test]
    fn test_protocol_errors_are_not_retried() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        assert!(PgExecutor::connect("not-a-database-url").await.is_err());
    }
}
