use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// A credential record from the `users` table. The password is stored as an
/// Argon2 PHC string and is never persisted or compared in plaintext.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    // Unique, trimmed at registration.
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Snippet
///
/// A stored code excerpt from the `snippets` table. `owner` is set once at
/// creation from the acting session identity and never reassigned; updates
/// touch only `code`, `tags` and `updated_at`.
#[derive(Debug, Clone, PartialEq, FromRow, Default)]
pub struct Snippet {
    pub id: Uuid,
    pub code: String,
    pub owner: String,
    // Ordered, each entry normalized to start with '#'.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// SnippetFilter
///
/// Optional exact-match listing filter, conjunctive when both fields are set.
/// Stored in the session so it survives across requests; independent of the
/// authentication state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnippetFilter {
    pub tag: Option<String>,
    pub owner: Option<String>,
}

impl SnippetFilter {
    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.owner.is_none()
    }
}

// --- Request Payloads (Form Schemas) ---

/// Input payload for the registration form (POST /register).
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

/// Input payload for the login form (POST /login).
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Input payload for creating or updating a snippet. `tags` arrives as the
/// raw whitespace-separated input and is normalized before persistence.
#[derive(Debug, Clone, Deserialize)]
pub struct SnippetForm {
    pub code: String,
    pub tags: String,
}

/// Input payload for the listing filter form (POST /filter).
#[derive(Debug, Clone, Deserialize)]
pub struct FilterForm {
    pub tag: String,
    pub owner: String,
}

// --- Field Validation ---

/// Validates and trims a username. At most 30 characters, required.
pub fn validate_username(raw: &str) -> Result<String, String> {
    let username = raw.trim();
    if username.is_empty() {
        return Err("A username is required.".to_string());
    }
    if username.chars().count() > 30 {
        return Err("The username must not be longer than 30 characters.".to_string());
    }
    Ok(username.to_string())
}

/// Validates a raw (pre-hash) password: 10 to 1000 characters.
pub fn validate_password(raw: &str) -> Result<(), String> {
    let len = raw.chars().count();
    if len < 10 {
        return Err("The password must be at least 10 characters long.".to_string());
    }
    if len > 1000 {
        return Err("The password must not be longer than 1000 characters.".to_string());
    }
    Ok(())
}

/// Validates snippet code: 3 to 10000 characters.
pub fn validate_code(raw: &str) -> Result<(), String> {
    let len = raw.chars().count();
    if len < 3 {
        return Err("The code must contain at least 3 characters.".to_string());
    }
    if len > 10000 {
        return Err("The code must not contain more than 10000 characters.".to_string());
    }
    Ok(())
}

// --- Tag Normalization ---

/// Splits raw tag input on whitespace and prefixes each token with '#' unless
/// it already starts with one. Input order is preserved; blank input yields an
/// empty sequence. Deterministic and idempotent: normalizing an
/// already-normalized sequence is a no-op.
pub fn normalize_tags(raw: &str) -> Vec<String> {
    raw.split_whitespace()
        .map(|token| {
            if token.starts_with('#') {
                token.to_string()
            } else {
                format!("#{token}")
            }
        })
        .collect()
}
