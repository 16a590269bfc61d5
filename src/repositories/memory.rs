//! In-process `UserStore` used by handler tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use jiff::civil::{DateTime, date};
use jiff::ToSpan;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User, UserFields};
use crate::repositories::UserStore;

struct StoredUser {
    user: User,
    /// `None` for users created through the form, like the NULL column
    password: Option<String>,
}

/// Mirrors `UserRepository` semantics, including the unique email index.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<StoredUser>>,
    fail_writes: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user with a password, bypassing the form (which has none)
    pub fn insert_with_password(&self, fields: &UserFields, password: &str) -> i32 {
        self.insert(fields, Some(password.to_string()))
    }

    fn insert(&self, fields: &UserFields, password: Option<String>) -> i32 {
        let new_user = NewUser::from(fields);
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i32 + 1;
        rows.push(StoredUser {
            user: User {
                id,
                name: new_user.name,
                email: new_user.email,
                phone: new_user.phone,
                created_at: timestamp_for(id),
            },
            password,
        });
        id
    }

    /// Make every later `create` fail like a storage fault
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

fn timestamp_for(id: i32) -> DateTime {
    date(2025, 3, 14)
        .at(9, 5, 0, 0)
        .checked_add(i64::from(id).minutes())
        .unwrap()
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list_all(&self) -> AppResult<Vec<User>> {
        let rows = self.rows.lock().unwrap();
        let mut users: Vec<User> = rows.iter().map(|r| r.user.clone()).collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.user.id == id).map(|r| r.user.clone()))
    }

    async fn create(&self, fields: &UserFields) -> AppResult<i32> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database {
                operation: "create user".to_string(),
                source: anyhow::anyhow!("storage unavailable"),
            });
        }
        if self.email_exists(&fields.email, None).await? {
            return Err(AppError::Duplicate {
                entity: "users".to_string(),
                field: "email".to_string(),
                value: fields.email.clone(),
            });
        }
        Ok(self.insert(fields, None))
    }

    async fn check_credentials(&self, email: &str, password: &str) -> AppResult<bool> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .any(|r| r.user.email == email && r.password.as_deref() == Some(password)))
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .any(|r| r.user.email == email && Some(r.user.id) != exclude_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserFields {
        UserFields::new("Alice Smith", "alice@example.com", "555-1234")
    }

    #[tokio::test]
    async fn test_create_then_find_round_trips() {
        let store = MemoryUserStore::new();
        let id = store.create(&alice()).await.unwrap();
        assert_eq!(id, 1);

        let user = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.name, "Alice Smith");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.phone.as_deref(), Some("555-1234"));
        assert!(store.find_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_email_exists_after_create() {
        let store = MemoryUserStore::new();
        assert!(!store.email_exists("alice@example.com", None).await.unwrap());

        let id = store.create(&alice()).await.unwrap();
        assert!(store.email_exists("alice@example.com", None).await.unwrap());
        assert!(!store.email_exists("alice@example.com", Some(id)).await.unwrap());
        assert!(!store.email_exists("nobody@example.com", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let store = MemoryUserStore::new();
        store.create(&alice()).await.unwrap();
        let bob = store
            .create(&UserFields::new("Bob", "bob@example.com", ""))
            .await
            .unwrap();

        let users = store.list_all().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, bob);
        assert_eq!(users[0].phone.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_on_create() {
        let store = MemoryUserStore::new();
        store.create(&alice()).await.unwrap();
        let err = store.create(&alice()).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate { ref field, .. } if field == "email"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_check_credentials_matches_both_fields() {
        let store = MemoryUserStore::new();
        store.insert_with_password(&alice(), "secret");

        assert!(store.check_credentials("alice@example.com", "secret").await.unwrap());
        assert!(!store.check_credentials("alice@example.com", "wrong").await.unwrap());
        assert!(!store.check_credentials("bob@example.com", "secret").await.unwrap());
    }

    #[tokio::test]
    async fn test_form_created_user_has_no_password() {
        let store = MemoryUserStore::new();
        store.create(&alice()).await.unwrap();

        assert!(!store.check_credentials("alice@example.com", "").await.unwrap());
    }

    #[tokio::test]
    async fn test_provided_validate_uses_field_rules() {
        let store = MemoryUserStore::new();
        let errors = store.validate(&UserFields::new("A", "bad", ""));
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("email"));
        assert!(!errors.contains_key("phone"));
    }
}
