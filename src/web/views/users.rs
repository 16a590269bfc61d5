use std::fmt::Write;

use jiff::civil::DateTime;

use crate::models::{FieldErrors, User, UserFields};
use crate::web::views::{PageContext, View, escape};

/// `Mar 4, 2025 at 9:05 AM`
const LIST_TIMESTAMP_FORMAT: &str = "%b %-d, %Y at %-I:%M %p";

const CLIENT_SCRIPT: &str = include_str!("../../../assets/user-list.js");

pub fn format_created_at(created_at: &DateTime) -> String {
    created_at.strftime(LIST_TIMESTAMP_FORMAT).to_string()
}

fn card_header(page: &PageContext) -> String {
    format!(
        r#"<div class="card-header d-flex justify-content-between align-items-center">
                <h2 class="card-title mb-0">Users Management</h2>
                <a href="{}" class="btn btn-primary">Add New User</a>
            </div>"#,
        page.href("create")
    )
}

const TABLE_HEAD: &str = r#"<thead class="table-dark">
                        <tr><th>ID</th><th>Name</th><th>Email</th><th>Phone</th><th>Created At</th></tr>
                    </thead>"#;

/// Server-rendered user table
pub struct UserListView {
    pub users: Vec<User>,
}

impl UserListView {
    fn empty_state(page: &PageContext) -> String {
        format!(
            r#"<div class="text-center py-5">
                    <h4 class="text-muted">No users found</h4>
                    <p class="text-muted">Start by adding your first user to the system.</p>
                    <a href="{}" class="btn btn-primary">Add First User</a>
                </div>"#,
            page.href("create")
        )
    }

    fn row(user: &User) -> String {
        let phone = match user.phone.as_deref().filter(|p| !p.is_empty()) {
            Some(phone) => format!(
                r#"<a href="tel:{0}" class="text-decoration-none">{0}</a>"#,
                escape(phone)
            ),
            None => r#"<span class="text-muted">Not provided</span>"#.to_string(),
        };

        format!(
            r#"<tr>
                            <td><span class="badge bg-secondary">{id}</span></td>
                            <td><strong>{name}</strong></td>
                            <td><a href="mailto:{email}" class="text-decoration-none">{email}</a></td>
                            <td>{phone}</td>
                            <td><small class="text-muted">{created_at}</small></td>
                        </tr>"#,
            id = user.id,
            name = escape(&user.name),
            email = escape(&user.email),
            phone = phone,
            created_at = escape(&format_created_at(&user.created_at)),
        )
    }
}

impl View for UserListView {
    fn title(&self) -> &str {
        "Users"
    }

    fn body(&self, page: &PageContext) -> String {
        let content = if self.users.is_empty() {
            Self::empty_state(page)
        } else {
            let mut rows = String::new();
            for user in &self.users {
                rows.push_str(&Self::row(user));
                rows.push('\n');
            }
            format!(
                r#"<div class="table-responsive">
                    <table class="table table-hover table-striped">
                    {head}
                    <tbody>
{rows}                    </tbody>
                    </table>
                </div>
                <div class="mt-3">
                    <small class="text-muted">Total users: <strong>{count}</strong></small>
                </div>"#,
                head = TABLE_HEAD,
                rows = rows,
                count = self.users.len(),
            )
        };

        format!(
            r#"<div class="row"><div class="col-12"><div class="card">
            {header}
            <div class="card-body">
                {content}
            </div>
        </div></div></div>"#,
            header = card_header(page),
            content = content,
        )
    }
}

/// Empty table filled in the browser from the JSON listing
pub struct UserListShellView;

impl View for UserListShellView {
    fn title(&self) -> &str {
        "Users"
    }

    fn body(&self, page: &PageContext) -> String {
        format!(
            r#"<div class="row"><div class="col-12"><div class="card">
            {header}
            <div class="card-body">
                <div class="table-responsive">
                    <table class="table table-hover table-striped">
                    {head}
                    <tbody id="users-table-body" data-source="{source}">
                        <tr><td colspan="5" class="text-center text-muted">Loading users...</td></tr>
                    </tbody>
                    </table>
                </div>
                <div class="mt-3"><small class="text-muted" id="users-count"></small></div>
            </div>
        </div></div></div>
<script>
{script}
</script>"#,
            header = card_header(page),
            head = TABLE_HEAD,
            source = page.href("api/users"),
            script = CLIENT_SCRIPT,
        )
    }
}

/// Create-user form, optionally echoing a rejected submission
#[derive(Default)]
pub struct CreateUserView {
    pub old: UserFields,
    pub errors: FieldErrors,
}

impl CreateUserView {
    pub fn with_errors(old: UserFields, errors: FieldErrors) -> Self {
        Self { old, errors }
    }

    fn input(&self, spec: InputSpec<'_>) -> String {
        let error = self.errors.get(spec.name);
        let mut html = String::new();
        let _ = write!(
            html,
            r#"<div class="mb-3">
                        <label for="{name}" class="form-label">{label}</label>
                        <input type="{kind}" class="form-control{invalid}" id="{name}" name="{name}" value="{value}" placeholder="{placeholder}"{required}>"#,
            name = spec.name,
            label = spec.label,
            kind = spec.kind,
            invalid = if error.is_some() { " is-invalid" } else { "" },
            value = escape(spec.value),
            placeholder = spec.placeholder,
            required = if spec.required { " required" } else { "" },
        );
        if let Some(message) = error {
            let _ = write!(
                html,
                "\n                        <div class=\"invalid-feedback\">{}</div>",
                escape(message)
            );
        }
        html.push_str("\n                    </div>");
        html
    }
}

struct InputSpec<'a> {
    name: &'a str,
    label: &'a str,
    kind: &'a str,
    value: &'a str,
    placeholder: &'a str,
    required: bool,
}

impl View for CreateUserView {
    fn title(&self) -> &str {
        "Create User"
    }

    fn body(&self, page: &PageContext) -> String {
        let general = self
            .errors
            .get("general")
            .map(|message| {
                format!(
                    r#"<div class="alert alert-danger">{}</div>"#,
                    escape(message)
                )
            })
            .unwrap_or_default();

        let name = self.input(InputSpec {
            name: "name",
            label: r#"Full Name <span class="text-danger">*</span>"#,
            kind: "text",
            value: &self.old.name,
            placeholder: "Enter full name",
            required: true,
        });
        let email = self.input(InputSpec {
            name: "email",
            label: r#"Email Address <span class="text-danger">*</span>"#,
            kind: "email",
            value: &self.old.email,
            placeholder: "Enter email address",
            required: true,
        });
        let phone = self.input(InputSpec {
            name: "phone",
            label: r#"Phone Number <span class="text-muted">(Optional)</span>"#,
            kind: "tel",
            value: &self.old.phone,
            placeholder: "Enter phone number",
            required: false,
        });

        format!(
            r#"<div class="row justify-content-center"><div class="col-md-8 col-lg-6">
        <div class="card">
            <div class="card-header"><h2 class="card-title mb-0">Create New User</h2></div>
            <div class="card-body">
                {general}
                <form method="POST" action="{action}" novalidate>
                    {name}
                    {email}
                    {phone}
                    <div class="d-grid gap-2 d-md-flex justify-content-md-end">
                        <a href="{home}" class="btn btn-secondary">Back to List</a>
                        <button type="submit" class="btn btn-primary">Create User</button>
                    </div>
                </form>
            </div>
        </div>
        <div class="mt-3"><div class="card"><div class="card-body">
            <h6 class="card-title">Information</h6>
            <ul class="mb-0 small text-muted">
                <li>Fields marked with <span class="text-danger">*</span> are required</li>
                <li>Email addresses must be unique in the system</li>
                <li>Phone number is optional but will be validated if provided</li>
            </ul>
        </div></div></div>
    </div></div>"#,
            general = general,
            action = page.href("store"),
            name = name,
            email = email,
            phone = phone,
            home = page.href(""),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn page() -> PageContext {
        PageContext {
            base_path: "/mvc".to_string(),
            logged_in: false,
        }
    }

    fn user(id: i32, name: &str, phone: Option<&str>) -> User {
        User {
            id,
            name: name.to_string(),
            email: format!("user{id}@example.com"),
            phone: phone.map(str::to_string),
            created_at: date(2025, 3, 4).at(21, 5, 0, 0),
        }
    }

    #[test]
    fn test_created_at_format() {
        assert_eq!(
            format_created_at(&date(2025, 3, 4).at(9, 5, 0, 0)),
            "Mar 4, 2025 at 9:05 AM"
        );
        assert_eq!(
            format_created_at(&date(2024, 12, 25).at(0, 30, 0, 0)),
            "Dec 25, 2024 at 12:30 AM"
        );
    }

    #[test]
    fn test_empty_list() {
        let html = UserListView { users: vec![] }.body(&page());
        assert!(html.contains("No users found"));
        assert!(!html.contains("Total users"));
    }

    #[test]
    fn test_list_rows_escape_and_count() {
        let view = UserListView {
            users: vec![
                user(2, "<script>alert(1)</script>", None),
                user(1, "Alice", Some("555-1234")),
            ],
        };
        let html = view.body(&page());
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("Not provided"));
        assert!(html.contains(r#"href="tel:555-1234""#));
        assert!(html.contains("Mar 4, 2025 at 9:05 PM"));
        assert!(html.contains("Total users: <strong>2</strong>"));
    }

    #[test]
    fn test_shell_embeds_script_and_source() {
        let html = UserListShellView.body(&page());
        assert!(html.contains(r#"data-source="/mvc/api/users""#));
        assert!(html.contains("loadUsersIntoTable"));
    }

    #[test]
    fn test_create_form_echoes_input_and_errors() {
        let mut errors = FieldErrors::new();
        errors.insert("email".to_string(), "Email address already exists".to_string());
        errors.insert("general".to_string(), "Failed to create user. Please try again.".to_string());
        let view = CreateUserView::with_errors(
            UserFields::new("Ann \"Q\"", "ann@example.com", ""),
            errors,
        );

        let html = view.body(&page());
        assert!(html.contains(r#"value="Ann &quot;Q&quot;""#));
        assert!(html.contains(r#"class="form-control is-invalid" id="email""#));
        assert!(html.contains("Email address already exists"));
        assert!(html.contains("Failed to create user. Please try again."));
        assert!(html.contains(r#"action="/mvc/store""#));
    }

    #[test]
    fn test_blank_create_form() {
        let html = CreateUserView::default().body(&page());
        assert!(!html.contains("is-invalid"));
        assert!(!html.contains("alert-danger"));
    }
}
