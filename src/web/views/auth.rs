use crate::web::views::{PageContext, View, escape};

/// Login form with an optional failure message
#[derive(Default)]
pub struct LoginView {
    pub error: Option<String>,
}

impl LoginView {
    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }
}

impl View for LoginView {
    fn title(&self) -> &str {
        "Login"
    }

    fn body(&self, page: &PageContext) -> String {
        let status = if page.logged_in {
            r#"<div class="alert alert-success">You are signed in.</div>"#
        } else {
            ""
        };
        let error = self
            .error
            .as_deref()
            .map(|message| format!(r#"<div class="alert alert-danger">{}</div>"#, escape(message)))
            .unwrap_or_default();

        format!(
            r#"<div class="row"><div class="col-12"><div class="card">
            <div class="card-header d-flex justify-content-between align-items-center">
                <h2 class="card-title mb-0">Login</h2>
                <a href="{home}" class="btn btn-primary">View Users</a>
            </div>
            <div class="card-body">
                {status}
                <form method="POST" action="{action}" novalidate>
                    <div class="mb-3">
                        <label for="email" class="form-label">Email address</label>
                        <input type="email" class="form-control" id="email" name="email" required>
                    </div>
                    <div class="mb-3">
                        <label for="password" class="form-label">Password</label>
                        <input type="password" class="form-control" id="password" name="password" required>
                    </div>
                    <div class="mb-3">{error}</div>
                    <button type="submit" class="btn btn-primary">Login</button>
                </form>
            </div>
        </div></div></div>"#,
            home = page.href(""),
            status = status,
            action = page.href("authenticate"),
            error = error,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_posts_to_authenticate() {
        let page = PageContext {
            base_path: String::new(),
            logged_in: false,
        };
        let html = LoginView::default().body(&page);
        assert!(html.contains(r#"action="/authenticate""#));
        assert!(!html.contains("alert-danger"));
    }

    #[test]
    fn test_login_error_is_escaped() {
        let page = PageContext {
            base_path: "/mvc".to_string(),
            logged_in: false,
        };
        let html = LoginView::with_error("Invalid <b>email</b>").body(&page);
        assert!(html.contains("Invalid &lt;b&gt;email&lt;/b&gt;"));
    }
}
