//! Layered settings loader
//!
//! Reads `default.toml`, `{environment}.toml` and `local.toml` from the
//! configuration directory (or one explicit file), then applies
//! `USERDESK_*` environment overrides.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
pub const CONFIG_DIR_ENV: &str = "USERDESK_CONFIG_DIR";

/// Environment variable for specific configuration file
pub const CONFIG_FILE_ENV: &str = "USERDESK_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "USERDESK";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Configuration loader that handles layered configuration loading
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// When set, layered loading is skipped
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a loader from `USERDESK_CONFIG_DIR`, `USERDESK_CONFIG_FILE` and
    /// `USERDESK_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Returns an error if both the directory and the file variables are set.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir_var = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && config_dir_var.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "USERDESK_CONFIG_DIR and USERDESK_CONFIG_FILE cannot both be set. \
                 Use USERDESK_CONFIG_DIR for layered configuration or \
                 USERDESK_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: config_dir_var
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Loader reading exactly one file, plus environment overrides
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Replace the environment used to pick `{environment}.toml`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Load and validate settings from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `default.toml` (or the explicit file) is not found
    /// - Configuration parsing fails
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        // USERDESK_SERVER__PORT -> server.port
        let builder = Self::add_env_source(builder);

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(
            File::new(&path.to_string_lossy(), FileFormat::Toml).required(required),
        ))
    }

    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialises tests that touch process environment variables
    pub(crate) static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Restores touched environment variables on drop
    pub(crate) struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        pub(crate) fn new() -> Self {
            Self {
                vars_to_restore: Vec::new(),
            }
        }

        pub(crate) fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        pub(crate) fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    const DEFAULT_TOML: &str = r#"
[application]
name = "test-desk"
version = "1.0.0"

[server]
host = "127.0.0.1"
port = 3000

[database]
host = "db.internal"
name = "mvc_demo"

[web]
base_path = "/mvc"
"#;

    fn clean_env(env: &mut EnvGuard) {
        env.remove(CONFIG_DIR_ENV);
        env.remove(CONFIG_FILE_ENV);
        env.remove(AppEnvironment::ENV_VAR);
        env.remove("USERDESK_SERVER__PORT");
        env.remove("USERDESK_WEB__DEBUG");
    }

    #[test]
    fn test_loader_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clean_env(&mut env);

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir, PathBuf::from("config"));
        assert!(loader.config_file.is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_loader_mutual_exclusivity() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clean_env(&mut env);
        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains(CONFIG_DIR_ENV));
                assert!(msg.contains(CONFIG_FILE_ENV));
            }
            other => panic!("Expected MutualExclusivityError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_default_toml() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clean_env(&mut env);
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let result = ConfigLoader::new().unwrap().load();
        match result {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("default.toml")),
            other => panic!("Expected FileNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_layers_in_order() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clean_env(&mut env);

        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("production.toml", "[server]\nport = 8080\n\n[web]\ndebug = false\n"),
            ("local.toml", "[web]\nuser_list = \"client\"\n"),
        ]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "production");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");
        assert_eq!(settings.application.name, "test-desk");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.host, "db.internal");
        assert_eq!(
            settings.web.user_list,
            crate::config::UserListMode::Client
        );
    }

    #[test]
    fn test_env_var_overrides_files() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clean_env(&mut env);

        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set("USERDESK_SERVER__PORT", "9123");
        env.set("USERDESK_WEB__DEBUG", "true");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");
        assert_eq!(settings.server.port, 9123);
        assert!(settings.web.debug);
    }

    #[test]
    fn test_single_file_mode() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clean_env(&mut env);

        let temp_dir = setup_config_dir(&[("custom.toml", "[server]\nport = 4000\n")]);
        let settings = ConfigLoader::from_file(temp_dir.path().join("custom.toml"))
            .load()
            .expect("Should load");
        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.web.base_path, "/mvc");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clean_env(&mut env);

        let temp_dir = setup_config_dir(&[("bad.toml", "[web]\nbase_path = \"mvc/\"\n")]);
        let result = ConfigLoader::from_file(temp_dir.path().join("bad.toml")).load();
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref field, .. }) if field == "web.base_path"
        ));
    }
}
