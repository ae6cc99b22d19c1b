//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity as stored in the `users` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
    pub profile_photo_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Columns a search criterion may name
    pub const SEARCH_COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "password",
        "is_admin",
        "profile_photo_path",
        "created_at",
        "updated_at",
    ];
}

/// Validated body of a user create or update request
///
/// An update writes every field, so `None` clears the stored photo path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
    pub profile_photo_path: Option<String>,
}
