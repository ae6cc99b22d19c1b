//! News repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use super::{Page, Repository, push_filter};
use crate::{
    filter::SearchFilter,
    models::{News, NewsPayload},
};

/// News repository for database operations
#[derive(Clone)]
pub struct NewsRepository {
    pool: PgPool,
}

impl NewsRepository {
    /// Create a new news repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for NewsRepository {
    type Record = News;
    type Payload = NewsPayload;

    async fn create(&self, payload: &NewsPayload) -> DatabaseResult<News> {
        info!("Creating news item: {}", payload.title);

        sqlx::query_as::<_, News>(
            r#"
            INSERT INTO news (title, content, cover_image, publish_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, cover_image, publish_date, created_at, updated_at
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.content)
        .bind(&payload.cover_image)
        .bind(payload.publish_date)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }

    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<News>> {
        sqlx::query_as::<_, News>(
            r#"
            SELECT id, title, content, cover_image, publish_date, created_at, updated_at
            FROM news
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }

    async fn find_all(&self, page: Page) -> DatabaseResult<Vec<News>> {
        sqlx::query_as::<_, News>(
            r#"
            SELECT id, title, content, cover_image, publish_date, created_at, updated_at
            FROM news
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }

    async fn find_by_filter(&self, filter: &SearchFilter) -> DatabaseResult<Vec<News>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, title, content, cover_image, publish_date, created_at, updated_at \
             FROM news",
        );
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY id");

        builder
            .build_query_as::<News>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::query)
    }

    async fn update(&self, id: i32, payload: &NewsPayload) -> DatabaseResult<Option<News>> {
        info!("Updating news item: {}", id);

        sqlx::query_as::<_, News>(
            r#"
            UPDATE news
            SET title = $1, content = $2, cover_image = $3, publish_date = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING id, title, content, cover_image, publish_date, created_at, updated_at
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.content)
        .bind(&payload.cover_image)
        .bind(payload.publish_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        info!("Deleting news item: {}", id);

        let result = sqlx::query("DELETE FROM news WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::query)?;

        Ok(result.rows_affected() > 0)
    }
}
