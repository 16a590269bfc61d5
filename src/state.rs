//! Shared request-handler state.

use std::sync::Arc;

use crate::config::WebConfig;
use crate::db::AsyncDbPool;
use crate::repositories::{UserRepository, UserStore};
use crate::web::session::{MemorySessionStore, SessionStore};

/// Everything a request needs: the user store, the session store and the
/// page settings. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub web: WebConfig,
}

impl AppState {
    /// Database-backed users with in-process sessions.
    ///
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let state = AppState::new(pool, settings.web.clone());
    /// ```
    pub fn new(pool: AsyncDbPool, web: WebConfig) -> Self {
        Self::with_stores(
            Arc::new(UserRepository::new(pool)),
            Arc::new(MemorySessionStore::new()),
            web,
        )
    }

    pub fn with_stores(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        web: WebConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            web,
        }
    }
}
