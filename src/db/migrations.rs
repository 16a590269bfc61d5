//! Embedded schema migrations.
//!
//! diesel_migrations drives a blocking `PgConnection`, so every helper hops
//! onto the blocking pool.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::{AppError, AppResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type MigrationError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn migration_error(operation: &'static str) -> impl Fn(MigrationError) -> AppError {
    move |e| AppError::Database {
        operation: operation.to_string(),
        source: anyhow::anyhow!("Migration error: {}", e),
    }
}

/// Names of migrations not yet applied
pub async fn pending_migrations(database_url: String) -> AppResult<Vec<String>> {
    with_connection(database_url, |conn| {
        let pending = conn
            .pending_migrations(MIGRATIONS)
            .map_err(migration_error("check pending migrations"))?;
        Ok(pending.iter().map(|m| m.name().to_string()).collect())
    })
    .await
}

/// Apply every pending migration, returning the applied versions
pub async fn run_pending_migrations(database_url: String) -> AppResult<Vec<String>> {
    with_connection(database_url, |conn| {
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(migration_error("run pending migrations"))?;
        Ok(applied.iter().map(|v| v.to_string()).collect())
    })
    .await
}

/// Revert the newest `steps` migrations, returning the reverted versions.
///
/// Refuses to start when fewer than `steps` migrations are applied.
pub async fn revert_migrations(database_url: String, steps: u32) -> AppResult<Vec<String>> {
    with_connection(database_url, move |conn| {
        let applied = conn
            .applied_migrations()
            .map_err(migration_error("get applied migrations"))?;

        if applied.len() < steps as usize {
            return Err(AppError::Validation {
                field: "rollback_steps".to_string(),
                reason: format!(
                    "Cannot rollback {} migrations - only {} applied migrations available",
                    steps,
                    applied.len()
                ),
            });
        }

        let mut reverted = Vec::with_capacity(steps as usize);
        for _ in 0..steps {
            let version = conn
                .revert_last_migration(MIGRATIONS)
                .map_err(migration_error("revert migration"))?;
            reverted.push(version.to_string());
        }
        Ok(reverted)
    })
    .await
}

async fn with_connection<T, F>(database_url: String, f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url).map_err(|e| AppError::Database {
            operation: "establish connection for migrations".to_string(),
            source: anyhow::anyhow!("Connection error: {}", e),
        })?;
        f(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal {
        source: anyhow::Error::from(e),
    })?
}
