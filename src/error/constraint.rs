//! Extraction of structured details from PostgreSQL constraint messages.

use std::sync::LazyLock;

use regex::Regex;

/// Matches "Key (field)=(value)" in a PostgreSQL DETAIL line
static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("key/value pattern is valid")
});

/// Matches `column "name"`
static COLUMN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"column "([^"]+)""#).expect("column pattern is valid"));

/// Matches `relation "name"` or `table "name"`
static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:relation|table) "([^"]+)""#).expect("table pattern is valid")
});

/// Entity/field/value triple recovered from a constraint violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintDetails {
    pub entity: String,
    pub field: String,
    pub value: String,
}

impl ConstraintDetails {
    /// Parses a unique violation.
    ///
    /// The constraint name (`users_email_key`) wins for entity and field; the
    /// DETAIL line supplies the offending value.
    pub fn from_unique_violation(message: &str, constraint_name: Option<&str>) -> Option<Self> {
        let key_value = extract_key_value(message);

        if let Some((entity, field)) = constraint_name.and_then(split_constraint_name) {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some(Self {
                entity,
                field,
                value,
            });
        }

        let (field, value) = key_value?;
        let entity = extract_table(message).unwrap_or_else(|| "resource".to_string());
        Some(Self {
            entity,
            field,
            value,
        })
    }

    /// Column named by a not-null violation, if any.
    pub fn not_null_column(message: &str) -> Option<String> {
        COLUMN_NAME
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

/// `users_email_key` -> ("users", "email"); multi-word fields keep their underscores.
fn split_constraint_name(constraint_name: &str) -> Option<(String, String)> {
    let stem = ["_key", "_idx", "_check", "_fkey"]
        .iter()
        .find_map(|suffix| constraint_name.strip_suffix(suffix))?;
    let (entity, field) = stem.split_once('_')?;
    if entity.is_empty() || field.is_empty() {
        return None;
    }
    Some((entity.to_string(), field.to_string()))
}

fn extract_key_value(message: &str) -> Option<(String, String)> {
    KEY_VALUE.captures(message).and_then(|caps| {
        let field = caps.get(1)?.as_str().to_string();
        let value = caps.get(2)?.as_str().to_string();
        Some((field, value))
    })
}

fn extract_table(message: &str) -> Option<String> {
    TABLE_NAME
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
