//! Repository layer for data access operations.
//!
//! Handlers only ever see `Arc<dyn UserStore>`; `UserRepository` is the
//! diesel-backed implementation.

#[cfg(test)]
mod memory;
mod user_repo;

#[cfg(test)]
pub use memory::MemoryUserStore;
pub use user_repo::UserRepository;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{FieldErrors, User, UserFields};

/// Every operation on the user table.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, newest first
    async fn list_all(&self) -> AppResult<Vec<User>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Insert a user and return its id.
    ///
    /// Callers run [`UserStore::validate`] and [`UserStore::email_exists`]
    /// first; nothing is re-checked here apart from the storage unique index,
    /// which surfaces as `AppError::Duplicate`.
    async fn create(&self, fields: &UserFields) -> AppResult<i32>;

    /// True when at least one row matches both values exactly; users
    /// without a stored password never match
    async fn check_credentials(&self, email: &str, password: &str) -> AppResult<bool>;

    /// True when another row already uses `email`, ignoring `exclude_id`
    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool>;

    fn validate(&self, fields: &UserFields) -> FieldErrors {
        fields.field_errors()
    }
}
