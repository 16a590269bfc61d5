//! User controller: one function per page action.
//!
//! Every action receives the session explicitly and returns either a
//! rendered view or a redirect. Storage failures on the create path are
//! mapped to form errors; anything else propagates to the dispatch
//! boundary as an `AppError`.

use axum::{
    Form,
    extract::{FromRequest, Request},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::config::UserListMode;
use crate::error::{AppError, AppResult};
use crate::models::{FieldErrors, UserFields};
use crate::state::AppState;
use crate::web::dto::{CreateUserForm, LoginForm};
use crate::web::routes::Action;
use crate::web::session::SessionContext;
use crate::web::views::{
    CreateUserView, LoginView, PageContext, UserListShellView, UserListView, respond,
};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";
pub const EMAIL_TAKEN: &str = "Email address already exists";
pub const CREATE_FAILED: &str = "Failed to create user. Please try again.";

/// Run `action` for one request
pub async fn handle(
    action: Action,
    state: &AppState,
    session: SessionContext,
    request: Request,
) -> AppResult<Response> {
    let page = PageContext::new(&state.web, session.is_logged_in());

    match action {
        Action::Index => index(state, &page).await,
        Action::Login => Ok(login(&page)),
        Action::Authenticate => authenticate(state, session, &page, request).await,
        Action::Create => Ok(create(&page)),
        Action::Store => store(state, &page, request).await,
    }
}

async fn index(state: &AppState, page: &PageContext) -> AppResult<Response> {
    match state.web.user_list {
        UserListMode::Server => {
            let users = state.users.list_all().await?;
            Ok(respond(StatusCode::OK, &UserListView { users }, page))
        }
        UserListMode::Client => Ok(respond(StatusCode::OK, &UserListShellView, page)),
    }
}

fn login(page: &PageContext) -> Response {
    respond(StatusCode::OK, &LoginView::default(), page)
}

async fn authenticate(
    state: &AppState,
    mut session: SessionContext,
    page: &PageContext,
    request: Request,
) -> AppResult<Response> {
    if request.method() != Method::POST {
        return Ok(redirect(&state.web.url_for("login")));
    }

    let Form(form) = read_form::<LoginForm>(state, request).await?;
    let (email, password) = form.credentials();

    if password.is_empty() || !state.users.check_credentials(email, password).await? {
        tracing::debug!("Login rejected");
        return Ok(respond(
            StatusCode::OK,
            &LoginView::with_error(INVALID_CREDENTIALS),
            page,
        ));
    }

    session.log_in();
    tracing::info!("User signed in");

    Ok((session.cookie_jar(), redirect(&state.web.url_for(""))).into_response())
}

fn create(page: &PageContext) -> Response {
    respond(StatusCode::OK, &CreateUserView::default(), page)
}

async fn store(state: &AppState, page: &PageContext, request: Request) -> AppResult<Response> {
    if request.method() != Method::POST {
        return Ok(redirect(&state.web.url_for("create")));
    }

    let Form(form) = read_form::<CreateUserForm>(state, request).await?;
    let fields = form.into_fields();

    let mut errors = state.users.validate(&fields);
    if !errors.contains_key("email") && state.users.email_exists(&fields.email, None).await? {
        errors.insert("email".to_string(), EMAIL_TAKEN.to_string());
    }

    if !errors.is_empty() {
        tracing::debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Create user rejected");
        return Ok(rerender(fields, errors, page));
    }

    match state.users.create(&fields).await {
        Ok(_) => Ok(redirect(&state.web.url_for(""))),
        Err(AppError::Duplicate { .. }) => {
            // Lost the race against a concurrent insert of the same email.
            let errors = [("email".to_string(), EMAIL_TAKEN.to_string())].into();
            Ok(rerender(fields, errors, page))
        }
        Err(error) => {
            tracing::error!(error = %error, cause = ?error, "Failed to create user");
            let errors = [("general".to_string(), CREATE_FAILED.to_string())].into();
            Ok(rerender(fields, errors, page))
        }
    }
}

fn rerender(fields: UserFields, errors: FieldErrors, page: &PageContext) -> Response {
    respond(
        StatusCode::OK,
        &CreateUserView::with_errors(fields, errors),
        page,
    )
}

async fn read_form<T>(state: &AppState, request: Request) -> AppResult<Form<T>>
where
    T: serde::de::DeserializeOwned,
{
    Form::<T>::from_request(request, state)
        .await
        .map_err(|rejection| AppError::BadRequest {
            message: rejection.body_text(),
        })
}

/// 302 with an empty body
fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
