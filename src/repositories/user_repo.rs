//! User repository for async database operations.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{NewUser, User, UserFields, UserRow};
use crate::repositories::UserStore;

/// User repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap
/// (just reference count increment). No need for `Arc<UserRepository>`.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

/// Convert a diesel failure, logging it unless the client caused it
fn storage_error(operation: &'static str) -> impl FnOnce(diesel::result::Error) -> AppError {
    move |error| {
        let error = DatabaseErrorConverter::convert_diesel_error(error, operation);
        if !error.is_client_error() {
            tracing::error!(operation, error = %error, "User repository operation failed");
        }
        error
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn list_all(&self) -> AppResult<Vec<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let rows = users
            .select(UserRow::as_select())
            .order((created_at.desc(), id.desc()))
            .load(&mut conn)
            .await
            .map_err(storage_error("list users"))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let row = users
            .filter(id.eq(user_id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(storage_error("find user by id"))?;

        Ok(row.map(User::from))
    }

    async fn create(&self, fields: &UserFields) -> AppResult<i32> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let new_id: i32 = diesel::insert_into(users)
            .values(NewUser::from(fields))
            .returning(id)
            .get_result(&mut conn)
            .await
            .map_err(storage_error("create user"))?;

        tracing::info!(user_id = new_id, "User created");
        Ok(new_id)
    }

    async fn check_credentials(&self, user_email: &str, user_password: &str) -> AppResult<bool> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        // Plaintext comparison: the schema stores passwords verbatim. A NULL
        // password never compares equal, so form-created users cannot match.
        diesel::select(exists(
            users.filter(email.eq(user_email).and(password.eq(user_password))),
        ))
        .get_result(&mut conn)
        .await
        .map_err(storage_error("check credentials"))
    }

    async fn email_exists(&self, user_email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let query = match exclude_id {
            Some(excluded) => diesel::select(exists(
                users.filter(email.eq(user_email).and(id.ne(excluded))),
            ))
            .get_result(&mut conn)
            .await,
            None => {
                diesel::select(exists(users.filter(email.eq(user_email))))
                    .get_result(&mut conn)
                    .await
            }
        };

        query.map_err(storage_error("check email uniqueness"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::{establish_async_connection_pool, run_pending_migrations};

    /// The tests share one database and wipe the table first
    static DATABASE: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

    async fn repository() -> UserRepository {
        let url = std::env::var("USERDESK_DATABASE__URL")
            .expect("USERDESK_DATABASE__URL must point at a scratch PostgreSQL database");
        run_pending_migrations(url.clone()).await.unwrap();

        let config = DatabaseConfig {
            url,
            max_connections: 2,
            min_connections: 1,
            ..DatabaseConfig::default()
        };
        let pool = establish_async_connection_pool(&config).await.unwrap();
        {
            let mut conn = pool.get().await.unwrap();
            diesel::delete(crate::schema::users::table)
                .execute(&mut conn)
                .await
                .unwrap();
        }
        UserRepository::new(pool)
    }

    async fn set_password(repo: &UserRepository, user_id: i32, secret: &str) {
        use crate::schema::users::dsl::*;
        let mut conn = repo.pool.get().await.unwrap();
        diesel::update(users.filter(id.eq(user_id)))
            .set(password.eq(Some(secret)))
            .execute(&mut conn)
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "needs PostgreSQL at USERDESK_DATABASE__URL"]
    async fn test_create_then_find_keeps_fields() {
        let _guard = DATABASE.lock().await;
        let repo = repository().await;

        let fields = UserFields::new("Alice Smith", "alice@example.com", "");
        let new_id = repo.create(&fields).await.unwrap();

        let user = repo.find_by_id(new_id).await.unwrap().unwrap();
        assert_eq!(user.name, "Alice Smith");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.phone.as_deref(), Some(""));
        assert!(repo.find_by_id(new_id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "needs PostgreSQL at USERDESK_DATABASE__URL"]
    async fn test_list_all_is_newest_first() {
        let _guard = DATABASE.lock().await;
        let repo = repository().await;

        let first = repo
            .create(&UserFields::new("Alice Smith", "alice@example.com", ""))
            .await
            .unwrap();
        let second = repo
            .create(&UserFields::new("Bob Jones", "bob@example.com", "555-123-4567"))
            .await
            .unwrap();

        let ids: Vec<i32> = repo.list_all().await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    #[ignore = "needs PostgreSQL at USERDESK_DATABASE__URL"]
    async fn test_email_exists_honours_exclusion() {
        let _guard = DATABASE.lock().await;
        let repo = repository().await;

        let alice = repo
            .create(&UserFields::new("Alice Smith", "alice@example.com", ""))
            .await
            .unwrap();

        assert!(repo.email_exists("alice@example.com", None).await.unwrap());
        assert!(!repo.email_exists("alice@example.com", Some(alice)).await.unwrap());
        assert!(!repo.email_exists("bob@example.com", None).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "needs PostgreSQL at USERDESK_DATABASE__URL"]
    async fn test_check_credentials_requires_stored_password() {
        let _guard = DATABASE.lock().await;
        let repo = repository().await;

        let alice = repo
            .create(&UserFields::new("Alice Smith", "alice@example.com", ""))
            .await
            .unwrap();
        assert!(!repo.check_credentials("alice@example.com", "").await.unwrap());

        set_password(&repo, alice, "secret").await;
        assert!(repo.check_credentials("alice@example.com", "secret").await.unwrap());
        assert!(!repo.check_credentials("alice@example.com", "wrong").await.unwrap());
    }

    #[tokio::test]
    #[ignore = "needs PostgreSQL at USERDESK_DATABASE__URL"]
    async fn test_duplicate_email_is_reported() {
        let _guard = DATABASE.lock().await;
        let repo = repository().await;

        let fields = UserFields::new("Alice Smith", "alice@example.com", "");
        repo.create(&fields).await.unwrap();

        let error = repo.create(&fields).await.unwrap_err();
        assert!(matches!(error, AppError::Duplicate { .. }), "got {error:?}");
    }
}
