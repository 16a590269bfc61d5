//! Converting `AppError` into HTTP responses.
//!
//! The JSON listing uses `IntoResponse` and [`error_response`]; HTML pages
//! go through [`render_error_page`] at the dispatch boundary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::config::WebConfig;
use crate::error::AppError;
use crate::web::dto::ErrorResponse;
use crate::web::views::{
    BadRequestView, ErrorDetail, NotFoundView, PageContext, ServerErrorView, respond,
};

/// Status and JSON body for an error.
///
/// Internal failures never leak their source to the client.
pub fn error_response(error: &AppError) -> (StatusCode, ErrorResponse) {
    match error {
        AppError::NotFound {
            entity,
            field,
            value,
        } => (
            StatusCode::NOT_FOUND,
            ErrorResponse::not_found_error(entity, field, value),
        ),
        AppError::Duplicate {
            entity,
            field,
            value,
        } => (
            StatusCode::CONFLICT,
            ErrorResponse::duplicate_error(entity, field, value),
        ),
        AppError::Validation { field, reason } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::validation_error(field, reason),
        ),
        AppError::BadRequest { message } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("BAD_REQUEST", message),
        ),
        AppError::Database { operation, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(
                "DATABASE_ERROR",
                &format!("Database operation failed: {}", operation),
            )
            .with_details(json!({ "operation": operation })),
        ),
        AppError::Configuration { key, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("CONFIGURATION_ERROR", &format!("Configuration error: {}", key)),
        ),
        AppError::ConnectionPool { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable"),
        ),
        AppError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred"),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = error_response(&self);
        (status, Json(body)).into_response()
    }
}

/// HTML page for an error that escaped a controller action.
///
/// Server errors are logged with their cause chain; client errors are not
/// incidents and are only traced at debug level.
pub fn render_error_page(
    web: &WebConfig,
    page: &PageContext,
    error: &AppError,
    request_id: Option<&str>,
) -> Response {
    let (status, _) = error_response(error);

    if status.is_server_error() {
        tracing::error!(
            error = %error,
            cause = ?error,
            request_id = request_id.unwrap_or("unknown"),
            "Unhandled error while dispatching request"
        );
    } else {
        tracing::debug!(error = %error, "Request rejected");
    }

    match error {
        AppError::NotFound { .. } => respond(status, &NotFoundView, page),
        _ if status.is_client_error() => respond(
            status,
            &BadRequestView {
                message: error.to_string(),
            },
            page,
        ),
        _ => {
            let detail = web.debug.then(|| ErrorDetail::from_error(error));
            respond(status, &ServerErrorView { detail }, page)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn page() -> PageContext {
        PageContext {
            base_path: "/mvc".to_string(),
            logged_in: false,
        }
    }

    fn database_error() -> AppError {
        AppError::Database {
            operation: "list users".to_string(),
            source: anyhow::anyhow!("connection reset by peer"),
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::NotFound {
                    entity: "users".into(),
                    field: "id".into(),
                    value: "9".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Duplicate {
                    entity: "users".into(),
                    field: "email".into(),
                    value: "a@b.co".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                AppError::BadRequest {
                    message: "bad form".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (database_error(), StatusCode::INTERNAL_SERVER_ERROR),
            (
                AppError::ConnectionPool {
                    source: anyhow::anyhow!("timed out"),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error_response(&error).0, expected, "{error}");
        }
    }

    #[tokio::test]
    async fn test_json_body_hides_internal_source() {
        let response = AppError::Internal {
            source: anyhow::anyhow!("secret stack detail"),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_text(response).await;
        assert!(body.contains("INTERNAL_ERROR"));
        assert!(!body.contains("secret stack detail"));
    }

    #[tokio::test]
    async fn test_error_page_generic_in_production() {
        let web = WebConfig::default();
        let response = render_error_page(&web, &page(), &database_error(), Some("req-1"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_text(response).await;
        assert!(body.contains("Internal Server Error"));
        assert!(!body.contains("connection reset by peer"));
    }

    #[tokio::test]
    async fn test_error_page_diagnostic_in_debug() {
        let web = WebConfig {
            debug: true,
            ..WebConfig::default()
        };
        let body = body_text(render_error_page(&web, &page(), &database_error(), None)).await;
        assert!(body.contains("Error: Database operation failed: list users"));
        assert!(body.contains("caused by: connection reset by peer"));
    }

    #[tokio::test]
    async fn test_bad_request_page() {
        let error = AppError::BadRequest {
            message: "Form body could not be read".into(),
        };
        let response = render_error_page(&WebConfig::default(), &page(), &error, None);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Form body could not be read"));
    }
}
