use crate::error::{AppError, ConstraintDetails};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn diesel::result::DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();

        match kind {
            DatabaseErrorKind::UniqueViolation => {
                // PostgreSQL reports the offending key in DETAIL, not the primary message
                let full = match info.details() {
                    Some(detail) => format!("{}\n{}", message, detail),
                    None => message.to_string(),
                };
                match ConstraintDetails::from_unique_violation(&full, info.constraint_name()) {
                    Some(details) => AppError::Duplicate {
                        entity: details.entity,
                        field: details.field,
                        value: details.value,
                    },
                    None => AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::Error::msg(format!(
                            "Unique constraint violation: {}",
                            message
                        )),
                    },
                }
            }
            DatabaseErrorKind::NotNullViolation => match ConstraintDetails::not_null_column(message)
            {
                Some(field) => AppError::Validation {
                    field,
                    reason: "Field is required".to_string(),
                },
                None => AppError::Database {
                    operation: operation.to_string(),
                    source: anyhow::Error::msg(format!(
                        "Not null constraint violation: {}",
                        message
                    )),
                },
            },
            _ => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(format!("Database error: {}", message)),
            },
        }
    }
}
