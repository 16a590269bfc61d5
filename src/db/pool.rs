//! Async database connection pool implementation.
//!
//! Uses bb8 connection pool manager with diesel_async for PostgreSQL connections.

use std::time::Duration;

use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::config::DatabaseConfig;
use crate::error::AppError;

/// Async connection pool type alias.
///
/// bb8::Pool internally uses Arc, so Clone is cheap (just reference count increment).
/// Structures holding AsyncDbPool can derive Clone without additional Arc wrapping.
pub type AsyncDbPool = Pool<AsyncPgConnection>;

/// Creates an async database connection pool and proves it can reach the server.
///
/// A failure here is fatal: the application never starts serving pages with
/// a database it cannot talk to.
///
/// # Errors
///
/// - `AppError::ConnectionPool` - If no connection can be checked out in time
/// - `AppError::Database` - If the probe query fails
///
/// # Example
///
/// ```ignore
/// let pool = establish_async_connection_pool(&settings.database).await?;
/// let mut conn = pool.get().await?;
/// ```
pub async fn establish_async_connection_pool(
    config: &DatabaseConfig,
) -> Result<AsyncDbPool, AppError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.connection_url());
    let pool = Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build(manager)
        .await?;

    probe(&pool).await?;

    tracing::info!(
        host = %config.host,
        database = %config.name,
        max_connections = config.max_connections,
        "Database connection pool established"
    );

    Ok(pool)
}

async fn probe(pool: &AsyncDbPool) -> Result<(), AppError> {
    let mut conn = pool.get().await?;
    diesel::sql_query("SELECT 1")
        .execute(&mut conn)
        .await
        .map_err(|e| AppError::Database {
            operation: "probe database connection".to_string(),
            source: anyhow::Error::from(e),
        })?;
    Ok(())
}
