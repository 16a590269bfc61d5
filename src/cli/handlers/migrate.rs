//! `migrate` command: apply, preview or revert embedded migrations

use crate::config::Settings;
use crate::db;
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// `dry_run` lists pending migrations; `rollback` reverts that many
    /// applied migrations; neither applies everything pending.
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        if rollback == Some(0) {
            return Err(AppError::Validation {
                field: "rollback_steps".to_string(),
                reason: "Number of rollback steps must be greater than 0".to_string(),
            });
        }

        self.config.database.validate()?;
        let database_url = self.config.database.connection_url();

        if dry_run {
            let pending = db::pending_migrations(database_url).await?;
            if pending.is_empty() {
                println!("No pending migrations, database is up to date");
            } else {
                println!("Found {} pending migration(s):", pending.len());
                for name in &pending {
                    println!("  - {}", name);
                }
                println!("\nRun without --dry-run to apply these migrations");
            }
            return Ok(());
        }

        match rollback {
            Some(steps) => {
                println!("Rolling back {} migration(s)...", steps);
                let reverted = db::revert_migrations(database_url, steps).await?;
                for version in &reverted {
                    println!("  - reverted {}", version);
                }
                println!("Rolled back {} migration(s)", reverted.len());
            }
            None => {
                println!("Running database migrations...");
                let applied = db::run_pending_migrations(database_url).await?;
                if applied.is_empty() {
                    println!("No migrations to apply, database is already up to date");
                } else {
                    println!("Applied {} migration(s):", applied.len());
                    for version in &applied {
                        println!("  - {}", version);
                    }
                }
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
