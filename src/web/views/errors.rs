use std::error::Error;

use crate::web::views::{PageContext, View, escape};

pub struct NotFoundView;

impl View for NotFoundView {
    fn title(&self) -> &str {
        "Page Not Found"
    }

    fn body(&self, page: &PageContext) -> String {
        status_card(
            page,
            "404",
            "Page Not Found",
            "The page you are looking for might have been removed, had its name changed, or is temporarily unavailable.",
        )
    }
}

/// Message and cause chain shown on 500 pages in debug mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub message: String,
    pub chain: Vec<String>,
}

impl ErrorDetail {
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: error.to_string(),
            chain,
        }
    }
}

/// 500 page; carries a diagnostic only when debug output is enabled
#[derive(Default)]
pub struct ServerErrorView {
    pub detail: Option<ErrorDetail>,
}

impl View for ServerErrorView {
    fn title(&self) -> &str {
        "Internal Server Error"
    }

    fn body(&self, page: &PageContext) -> String {
        let Some(detail) = &self.detail else {
            return status_card(
                page,
                "500",
                "Internal Server Error",
                "Something went wrong on our servers. Please try again later.",
            );
        };

        let chain: String = detail
            .chain
            .iter()
            .map(|cause| format!("caused by: {}\n", escape(cause)))
            .collect();

        format!(
            r#"<h1>500 - Internal Server Error</h1>
        <p>Error: {}</p>
        <pre>{}</pre>"#,
            escape(&detail.message),
            chain
        )
    }
}

/// Status page for client errors other than 404
pub struct BadRequestView {
    pub message: String,
}

impl View for BadRequestView {
    fn title(&self) -> &str {
        "Bad Request"
    }

    fn body(&self, page: &PageContext) -> String {
        status_card(page, "400", "Bad Request", &escape(&self.message))
    }
}

fn status_card(page: &PageContext, code: &str, heading: &str, message: &str) -> String {
    format!(
        r#"<div class="row justify-content-center"><div class="col-md-6 text-center">
        <div class="card"><div class="card-body py-5">
            <h1 class="display-4 text-danger">{code}</h1>
            <h3 class="mb-4">{heading}</h3>
            <p class="text-muted mb-4">{message}</p>
            <a href="{home}" class="btn btn-primary">Go Home</a>
        </div></div>
    </div></div>"#,
        home = page.href(""),
    )
}
