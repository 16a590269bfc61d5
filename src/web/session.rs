//! Cookie-keyed server-side sessions.
//!
//! The store is opaque key-value storage per session id; handlers only ever
//! touch it through a [`SessionContext`] built for the current request.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use dashmap::DashMap;
use uuid::Uuid;

/// Session key holding the authentication marker
pub const LOGIN_STATUS_KEY: &str = "login_status";

/// Marker value written on successful authentication
pub const LOGGED_IN: &str = "logged_in";

pub trait SessionStore: Send + Sync {
    fn get(&self, session_id: &str, key: &str) -> Option<String>;

    fn insert(&self, session_id: &str, key: &str, value: String);

    /// Drop the whole session
    fn remove(&self, session_id: &str);
}

/// Process-local session storage; sessions die with the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, session_id: &str, key: &str) -> Option<String> {
        self.sessions
            .get(session_id)
            .and_then(|session| session.get(key).cloned())
    }

    fn insert(&self, session_id: &str, key: &str, value: String) {
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    fn remove(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }
}

/// The current request's view of its session.
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    cookie_name: String,
    session_id: Option<String>,
    /// Set when this request created a new id the client has not seen yet
    minted: bool,
}

impl SessionContext {
    /// Read the session id from the request's `Cookie` headers
    pub fn from_headers(headers: &HeaderMap, store: Arc<dyn SessionStore>, cookie_name: &str) -> Self {
        let session_id = CookieJar::from_headers(headers)
            .get(cookie_name)
            .map(|cookie| cookie.value_trimmed().to_string())
            .filter(|value| !value.is_empty());

        Self {
            store,
            cookie_name: cookie_name.to_string(),
            session_id,
            minted: false,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session_id
            .as_deref()
            .and_then(|id| self.store.get(id, LOGIN_STATUS_KEY))
            .is_some_and(|status| status == LOGGED_IN)
    }

    /// Write the authentication marker under a freshly minted session id.
    ///
    /// Any session the client arrived with is discarded so a pre-login id
    /// can never be promoted.
    pub fn log_in(&mut self) {
        if let Some(previous) = self.session_id.take() {
            self.store.remove(&previous);
        }

        let session_id = Uuid::new_v4().to_string();
        self.store
            .insert(&session_id, LOGIN_STATUS_KEY, LOGGED_IN.to_string());
        self.session_id = Some(session_id);
        self.minted = true;
    }

    /// Session cookie to send when the id changed during this request
    pub fn cookie(&self) -> Option<Cookie<'static>> {
        if !self.minted {
            return None;
        }
        let session_id = self.session_id.clone()?;

        Some(
            Cookie::build((self.cookie_name.clone(), session_id))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build(),
        )
    }

    /// Response cookies: empty unless [`SessionContext::cookie`] has one
    pub fn cookie_jar(&self) -> CookieJar {
        match self.cookie() {
            Some(cookie) => CookieJar::new().add(cookie),
            None => CookieJar::new(),
        }
    }
}
