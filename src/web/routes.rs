//! Request routing.
//!
//! There is no route table: a single fallback handler resolves the path to
//! an action and hands the request to the controller, which checks methods
//! itself.

use std::fmt;
use std::str::FromStr;

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware,
    response::Response,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::state::AppState;
use crate::web::handlers;
use crate::web::middleware::{
    PanicPage, RequestId, logging_middleware, render_error_page, request_id_middleware,
};
use crate::web::session::SessionContext;
use crate::web::views::{NotFoundView, PageContext, respond};

/// Segment that sends a request to the JSON listing
const API_SEGMENT: &str = "api/users";

/// Page actions of the user controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Index,
    Login,
    Authenticate,
    Create,
    Store,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Index => "index",
            Action::Login => "login",
            Action::Authenticate => "authenticate",
            Action::Create => "create",
            Action::Store => "store",
        }
    }
}

impl FromStr for Action {
    type Err = String;

    /// Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index" => Ok(Action::Index),
            "login" => Ok(Action::Login),
            "authenticate" => Ok(Action::Authenticate),
            "create" => Ok(Action::Create),
            "store" => Ok(Action::Store),
            _ => Err(format!("Unknown action '{}'", s)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Api,
    Page(Action),
    NotFound,
}

/// Map a URL path (no query string) to a route.
///
/// Any path containing `api/users` goes to the JSON listing. Otherwise the
/// leading `base_path` is dropped and the first remaining segment names the
/// action, with an empty segment meaning `index`.
pub fn resolve(path: &str, base_path: &str) -> Route {
    if path.contains(API_SEGMENT) {
        return Route::Api;
    }

    // Plain text prefix, not a path segment: `/mvclogin` resolves to `login`
    let relative = path.strip_prefix(base_path).unwrap_or(path);
    let segment = relative
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default();
    let name = if segment.is_empty() { "index" } else { segment };

    name.parse().map(Route::Page).unwrap_or(Route::NotFound)
}

/// Build the application router.
///
/// Layers, outermost first: panic catcher, request id, request logging.
///
/// # Example
/// ```ignore
/// let state = AppState::new(pool, settings.web.clone());
/// let router = create_router(state);
/// ```
pub fn create_router(state: AppState) -> Router {
    let panic_page = PanicPage::new(state.web.clone());

    Router::new()
        .fallback(dispatch)
        // Last added runs first
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CatchPanicLayer::custom(panic_page))
        .with_state(state)
}

/// Top-level dispatch boundary: every `AppError` an action lets escape is
/// turned into an error page here.
async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let route = resolve(request.uri().path(), &state.web.base_path);

    if route == Route::Api {
        return handlers::users_api::handle(&state, request).await;
    }

    let session = SessionContext::from_headers(
        request.headers(),
        state.sessions.clone(),
        &state.web.session_cookie,
    );
    let page = PageContext::new(&state.web, session.is_logged_in());
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone());

    match route {
        Route::Page(action) => {
            tracing::debug!(action = %action, "Dispatching action");
            match handlers::users::handle(action, &state, session, request).await {
                Ok(response) => response,
                Err(error) => render_error_page(&state.web, &page, &error, request_id.as_deref()),
            }
        }
        _ => {
            tracing::debug!(path = %request.uri().path(), "No action for path");
            respond(StatusCode::NOT_FOUND, &NotFoundView, &page)
        }
    }
}
