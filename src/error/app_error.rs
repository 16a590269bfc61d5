use crate::config::error::ConfigError;
use crate::error::DatabaseErrorConverter;
use thiserror::Error;

/// Application-wide error type.
///
/// Storage, configuration and request failures all funnel into this enum.
/// The JSON surface renders it through `IntoResponse`; the HTML surface maps
/// it onto an error view at the dispatch boundary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Duplicate entry error for unique constraint violations
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// True for failures the client caused; these are never logged as incidents.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::NotFound { .. }
                | AppError::Duplicate { .. }
                | AppError::Validation { .. }
                | AppError::BadRequest { .. }
        )
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<diesel_async::pooled_connection::PoolError> for AppError {
    fn from(error: diesel_async::pooled_connection::PoolError) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::from(error),
        }
    }
}

impl From<bb8::RunError<diesel_async::pooled_connection::PoolError>> for AppError {
    fn from(error: bb8::RunError<diesel_async::pooled_connection::PoolError>) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::from(error),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::from(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_classified() {
        let duplicate = AppError::Duplicate {
            entity: "users".to_string(),
            field: "email".to_string(),
            value: "a@b.co".to_string(),
        };
        assert!(duplicate.is_client_error());

        let internal = AppError::Internal {
            source: anyhow::anyhow!("boom"),
        };
        assert!(!internal.is_client_error());
    }

    #[test]
    fn test_config_error_keeps_field_as_key() {
        let error = AppError::from(ConfigError::validation("server.port", "Port must be set"));
        match error {
            AppError::Configuration { key, .. } => assert_eq!(key, "server.port"),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_diesel_not_found_converts() {
        let error = AppError::from(diesel::result::Error::NotFound);
        assert!(matches!(error, AppError::NotFound { .. }));
    }
}
