//! Dispatches parsed CLI commands

use tracing::warn;

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;

/// Rollbacks above this many steps get a warning
const LARGE_ROLLBACK: u32 = 50;

/// Run the selected command
///
/// `serve` without `--dry-run` (and no command at all) returns `Ok(())`
/// without doing anything; the caller starts the server afterwards.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match &cli.command {
        Some(Commands::Serve { dry_run: true, .. }) => {
            ServeCommandHandler::new(settings).dry_run().await
        }
        Some(Commands::Serve { .. }) | None => Ok(()),
        Some(Commands::Migrate { dry_run, rollback }) => {
            if let Some(steps) = rollback {
                if *steps > LARGE_ROLLBACK {
                    warn!(steps = *steps, "Rolling back a large number of migrations");
                }
            }
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
        }
    }
}
