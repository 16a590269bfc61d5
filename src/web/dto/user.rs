//! User-related form payloads and JSON responses.

use serde::{Deserialize, Serialize};

use crate::models::{User, UserFields};

/// Timestamp layout used by the JSON listing
const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Form DTOs
// ============================================================================

/// Body of `POST /authenticate`; absent fields read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Trimmed `(email, password)`
    pub fn credentials(&self) -> (&str, &str) {
        (self.email.trim(), self.password.trim())
    }
}

/// Body of `POST /store`; absent fields read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl CreateUserForm {
    pub fn into_fields(self) -> UserFields {
        UserFields::new(&self.name, &self.email, &self.phone)
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// One element of the `api/users` array.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            created_at: user.created_at.strftime(API_TIMESTAMP_FORMAT).to_string(),
        }
    }
}
