//! `serve` command: dry-run validation; real startup happens in `Server::run`

use crate::config::Settings;
use crate::error::AppResult;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validate the merged settings and print what the server would do
    pub async fn dry_run(&self) -> AppResult<()> {
        self.config.validate()?;

        let web = &self.config.web;
        println!("Configuration is valid");
        println!("Server would bind to: {}", self.config.server.address());
        println!("Pages served under: {}/", web.base_path);
        println!("User list rendering: {:?}", web.user_list);
        println!(
            "Pending migrations applied on startup: {}",
            self.config.database.auto_migrate
        );
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
