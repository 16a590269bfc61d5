mod app_error;
mod constraint;
mod database_converter;

pub use app_error::{AppError, AppResult};
pub use constraint::ConstraintDetails;
pub use database_converter::DatabaseErrorConverter;
