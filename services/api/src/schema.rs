//! Table definitions and the startup schema sync

use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id                  SERIAL PRIMARY KEY,
    name                VARCHAR(255) NOT NULL,
    email               VARCHAR(255) NOT NULL UNIQUE,
    password            VARCHAR(255) NOT NULL,
    is_admin            BOOLEAN NOT NULL DEFAULT FALSE,
    profile_photo_path  VARCHAR(255),
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_NEWS: &str = r#"
CREATE TABLE IF NOT EXISTS news (
    id            SERIAL PRIMARY KEY,
    title         VARCHAR(255) NOT NULL,
    content       TEXT NOT NULL,
    cover_image   VARCHAR(255),
    publish_date  TIMESTAMPTZ,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Create the `users` and `news` tables if they do not exist yet
///
/// Existing tables are left untouched, even when their columns differ.
pub async fn sync(pool: &PgPool) -> DatabaseResult<()> {
    for statement in [CREATE_USERS, CREATE_NEWS] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(DatabaseError::Schema)?;
    }

    info!("Database & tables created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{News, User};

    #[test]
    fn every_searchable_column_exists() {
        for column in User::SEARCH_COLUMNS {
            assert!(CREATE_USERS.contains(&format!("\n    {} ", column)), "users.{column}");
        }
        for column in News::SEARCH_COLUMNS {
            assert!(CREATE_NEWS.contains(&format!("\n    {} ", column)), "news.{column}");
        }
    }
}
