//! Data Transfer Objects for form bodies and JSON responses.
//!
//! - `user` - Form payloads and the user listing response
//! - `error` - Common error response DTOs

mod error;
mod user;

pub use error::ErrorResponse;
pub use user::{CreateUserForm, LoginForm, UserResponse};
