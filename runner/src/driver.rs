// PostgreSQL driver: the database collaborator behind job statements

use async_trait::async_trait;
use cronjobs::errors::ExecutionError;
use cronjobs::executor::Driver;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Executes job statements against a shared PostgreSQL pool
pub struct PostgresDriver {
    pool: PgPool,
}

impl PostgresDriver {
    /// Connect a pool sized from configuration
    pub async fn connect(
        url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self, ExecutionError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect(url)
            .await
            .map_err(|e| {
                ExecutionError::ConnectionFailed(format!("Failed to connect to PostgreSQL: {}", e))
            })?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl Driver for PostgresDriver {
    #[tracing::instrument(skip(self, statement))]
    async fn execute(&self, statement: &str) -> Result<(), ExecutionError> {
        // Job files may hold several semicolon-separated statements.
        sqlx::raw_sql(statement)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| ExecutionError::QueryFailed(format!("PostgreSQL statement failed: {}", e)))
    }
}
