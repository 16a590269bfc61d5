//! Merges CLI overrides into file-based settings
//!
//! Precedence, lowest to highest: configuration files, `USERDESK_*`
//! environment variables, global flags (`--verbose`/`--quiet`), then
//! command flags (`serve --host/--port/--log-level`).

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load base settings the way the CLI asks for them
    ///
    /// `--config` selects single-file mode; otherwise the layered loader is
    /// used. `--env` replaces environment detection in either case.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match &cli.config {
            Some(path) => ConfigLoader::from_file(path),
            None => ConfigLoader::new()?,
        };
        let loader = match cli.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        };

        Ok(Self::new(loader.load()?))
    }

    /// Apply CLI overrides and validate the result
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::tests::ENV_MUTEX;
    use clap::Parser;
    use std::fs;

    fn merged(args: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(Settings::default())
            .merge_cli_args(&cli)
            .unwrap()
    }

    #[test]
    fn test_merger_keeps_base_config() {
        let base_config = Settings::default();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_global_log_flags() {
        assert_eq!(merged(&["user-desk", "--verbose"]).logger.level, "debug");
        assert_eq!(merged(&["user-desk", "--quiet"]).logger.level, "error");
    }

    #[test]
    fn test_serve_overrides() {
        let config = merged(&["user-desk", "serve", "--host", "0.0.0.0", "--port", "8080"]);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let config = merged(&["user-desk", "--verbose", "serve", "--log-level", "warn"]);
        assert_eq!(config.logger.level, "warn");
    }

    #[test]
    fn test_migrate_leaves_server_untouched() {
        let config = merged(&["user-desk", "migrate", "--dry-run"]);
        assert_eq!(config.server, Settings::default().server);
    }

    #[test]
    fn test_from_cli_single_file() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("only.toml");
        fs::write(&path, "[server]\nport = 4100\n\n[web]\nbase_path = \"/users\"\n").unwrap();

        let cli = Cli::try_parse_from(["user-desk", "--config", path.to_str().unwrap()]).unwrap();
        let merger = ConfigurationMerger::from_cli(&cli).unwrap();

        assert_eq!(merger.config().server.port, 4100);
        assert_eq!(merger.config().web.base_path, "/users");
    }
}
