//! News models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// News item as stored in the `news` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct News {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl News {
    /// Columns a search criterion may name
    pub const SEARCH_COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "content",
        "cover_image",
        "publish_date",
        "created_at",
        "updated_at",
    ];
}

/// Validated body of a news create or update request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsPayload {
    pub title: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,
}
