//! Configuration validation logic

use crate::config::error::ConfigError;
use crate::config::settings::{DatabaseConfig, LoggerSettings, ServerConfig, Settings, WebConfig};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host address is required.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - A non-empty URL must use a PostgreSQL scheme
    /// - Without a URL, host, username and database name are required
    /// - Pool bounds must be positive with min <= max
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.url.is_empty() {
            if !self.is_valid_database_url() {
                return Err(ConfigError::validation(
                    "database.url",
                    "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
                ));
            }
        } else {
            if self.host.trim().is_empty() {
                return Err(ConfigError::validation(
                    "database.host",
                    "Database host is required when no URL is given.",
                ));
            }
            if self.username.trim().is_empty() {
                return Err(ConfigError::validation(
                    "database.username",
                    "Database user is required when no URL is given.",
                ));
            }
            if self.name.trim().is_empty() {
                return Err(ConfigError::validation(
                    "database.name",
                    "Database name is required when no URL is given.",
                ));
            }
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }

    fn is_valid_database_url(&self) -> bool {
        ["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if self.file.enabled && self.file.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.file.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.file.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        Ok(())
    }
}

impl WebConfig {
    /// Validate web settings
    ///
    /// # Validation Rules
    /// - Base path is empty or starts with `/` and has no trailing `/`
    /// - Session cookie name is a non-empty token of `[A-Za-z0-9_-]`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_path.is_empty()
            && (!self.base_path.starts_with('/') || self.base_path.ends_with('/'))
        {
            return Err(ConfigError::ValidationError {
                field: "web.base_path".to_string(),
                message: format!(
                    "Invalid base path '{}'. Use an empty string or a path like '/mvc' without a trailing slash.",
                    self.base_path
                ),
            });
        }

        let cookie_ok = !self.session_cookie.is_empty()
            && self
                .session_cookie
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !cookie_ok {
            return Err(ConfigError::ValidationError {
                field: "web.session_cookie".to_string(),
                message: format!(
                    "Invalid session cookie name '{}'. Use letters, digits, '_' or '-'.",
                    self.session_cookie
                ),
            });
        }

        Ok(())
    }
}

impl Settings {
    /// Validates every section, returning the first failure
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logger.validate()?;
        self.web.validate()?;
        Ok(())
    }
}
