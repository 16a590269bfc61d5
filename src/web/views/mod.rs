//! Server-rendered HTML pages.
//!
//! Every page is a typed view model implementing [`View`]; the shared
//! layout supplies the document shell and navigation bar. Dynamic values
//! pass through [`escape`] before they reach markup.

mod auth;
mod errors;
mod users;

pub use auth::LoginView;
pub use errors::{BadRequestView, ErrorDetail, NotFoundView, ServerErrorView};
pub use users::{CreateUserView, UserListShellView, UserListView};

use std::fmt::Write;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::config::WebConfig;

/// Request-wide values every page needs
#[derive(Debug, Clone)]
pub struct PageContext {
    pub base_path: String,
    pub logged_in: bool,
}

impl PageContext {
    pub fn new(web: &WebConfig, logged_in: bool) -> Self {
        Self {
            base_path: web.base_path.clone(),
            logged_in,
        }
    }

    /// Link to an action under the base path, already escaped for attributes
    pub fn href(&self, action: &str) -> String {
        escape(&format!("{}/{}", self.base_path, action))
    }
}

pub trait View {
    fn title(&self) -> &str;

    /// Markup placed inside the layout's container
    fn body(&self, page: &PageContext) -> String;

    fn render(&self, page: &PageContext) -> String {
        layout(page, self.title(), &self.body(page))
    }
}

/// Render `view` as an HTML response with `status`
pub fn respond(status: StatusCode, view: &impl View, page: &PageContext) -> Response {
    (status, Html(view.render(page))).into_response()
}

/// Escape text for element content and quoted attribute values
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const STYLE: &str = r#"
        body { background-color: #f8f9fa; }
        .navbar { box-shadow: 0 2px 4px rgba(0, 0, 0, .1); }
        .card { box-shadow: 0 0.125rem 0.25rem rgba(0, 0, 0, 0.075); border: 1px solid rgba(0, 0, 0, 0.125); }
        .table-responsive { border-radius: 0.375rem; overflow: hidden; }
        .btn, .alert { border-radius: 0.375rem; }
"#;

fn layout(page: &PageContext, title: &str, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + 2048);
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | User Desk</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.1.3/dist/css/bootstrap.min.css" rel="stylesheet">
    <style>{style}</style>
</head>
<body>
    <nav class="navbar navbar-expand-lg navbar-dark bg-primary">
        <div class="container">
            <a class="navbar-brand" href="{home}"><strong>User Desk</strong></a>
            <div class="navbar-nav ms-auto">
                <a class="nav-link" href="{home}">Users List</a>
                <a class="nav-link" href="{create}">Add User</a>
"#,
        title = escape(title),
        style = STYLE,
        home = page.href(""),
        create = page.href("create"),
    );

    if page.logged_in {
        html.push_str("                <span class=\"navbar-text ms-3\">Signed in</span>\n");
    } else {
        let _ = writeln!(
            html,
            "                <a class=\"nav-link\" href=\"{}\">Login</a>",
            page.href("login")
        );
    }

    let _ = write!(
        html,
        r#"            </div>
        </div>
    </nav>
    <div class="container mt-4">
{body}
    </div>
</body>
</html>
"#
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl View for Plain {
        fn title(&self) -> &str {
            "Tom & Jerry"
        }

        fn body(&self, _page: &PageContext) -> String {
            "<p>hello</p>".to_string()
        }
    }

    fn page(logged_in: bool) -> PageContext {
        PageContext {
            base_path: "/mvc".to_string(),
            logged_in,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">O'Neil & co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;O&#039;Neil &amp; co&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_layout_wraps_body_and_links_under_base_path() {
        let html = Plain.render(&page(false));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Tom &amp; Jerry | User Desk</title>"));
        assert!(html.contains("<p>hello</p>"));
        assert!(html.contains(r#"href="/mvc/create""#));
        assert!(html.contains(r#"href="/mvc/login""#));
    }

    #[test]
    fn test_layout_reflects_login_state() {
        let html = Plain.render(&page(true));
        assert!(html.contains("Signed in"));
        assert!(!html.contains(r#"href="/mvc/login""#));
    }
}
