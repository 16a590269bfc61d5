use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use diesel::prelude::*;
use jiff::civil::DateTime;
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

/// Field name -> message, ordered so rendered error lists are stable
pub type FieldErrors = BTreeMap<String, String>;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\-+()\s]*$").expect("phone pattern is valid"));

/// A stored user as the rest of the application sees it.
///
/// The password column never leaves the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime,
}

/// Row shape selected from `users`
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: jiff_diesel::DateTime,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at.to_jiff(),
        }
    }
}

/// Insert payload; `id` and `created_at` take their column defaults and
/// `password` stays NULL, so form-created users cannot sign in
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<&UserFields> for NewUser {
    fn from(fields: &UserFields) -> Self {
        Self {
            name: fields.name.clone(),
            email: fields.email.clone(),
            phone: Some(fields.phone.clone()),
        }
    }
}

/// Submitted create-user form, already trimmed.
///
/// Each rule is checked independently so every failing field reports at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct UserFields {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(
        email(message = "Please enter a valid email address"),
        custom(function = "validate_email_domain")
    )]
    pub email: String,

    #[validate(regex(path = *PHONE_PATTERN, message = "Please enter a valid phone number"))]
    pub phone: String,
}

impl UserFields {
    pub fn new(name: &str, email: &str, phone: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
        }
    }

    /// Run every field rule, keyed by field name; empty when all pass
    pub fn field_errors(&self) -> FieldErrors {
        match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => flatten(&errors),
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < 2 {
        return Err(ValidationError::new("name_length")
            .with_message(Cow::Borrowed("Name must be at least 2 characters long")));
    }
    Ok(())
}

/// The domain must have at least two dot-separated labels (`localhost` fails)
fn validate_email_domain(email: &str) -> Result<(), ValidationError> {
    let dotted = email.rsplit_once('@').is_some_and(|(_, domain)| {
        domain.split('.').count() >= 2 && domain.split('.').all(|label| !label.is_empty())
    });
    if !dotted {
        return Err(ValidationError::new("email_domain")
            .with_message(Cow::Borrowed("Please enter a valid email address")));
    }
    Ok(())
}

fn flatten(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, list)| {
            let message = list.first()?.message.as_ref()?.to_string();
            Some((field.to_string(), message))
        })
        .collect()
}
