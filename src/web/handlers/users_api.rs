//! JSON listing behind any path containing `api/users`.

use axum::{
    Json,
    extract::Request,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::state::AppState;
use crate::web::dto::{ErrorResponse, UserResponse};
use crate::web::middleware::{RequestId, error_response};

/// GET returns every user, newest first; other methods get 405.
pub async fn handle(state: &AppState, request: Request) -> Response {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone());

    if request.method() != Method::GET {
        let mut body = ErrorResponse::new(
            "METHOD_NOT_ALLOWED",
            &format!("Method {} is not allowed on this endpoint", request.method()),
        );
        if let Some(id) = &request_id {
            body = body.with_request_id(id);
        }
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET")],
            Json(body),
        )
            .into_response();
    }

    match state.users.list_all().await {
        Ok(users) => {
            let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            Json(body).into_response()
        }
        Err(error) => {
            tracing::error!(error = %error, cause = ?error, "Failed to list users for API");
            let (status, mut body) = error_response(&error);
            if let Some(id) = &request_id {
                body = body.with_request_id(id);
            }
            (status, Json(body)).into_response()
        }
    }
}
