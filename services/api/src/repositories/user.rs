//! User repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use super::{Page, Repository, push_filter};
use crate::{
    filter::SearchFilter,
    models::{User, UserPayload},
};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for UserRepository {
    type Record = User;
    type Payload = UserPayload;

    async fn create(&self, payload: &UserPayload) -> DatabaseResult<User> {
        info!("Creating new user: {}", payload.email);

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, is_admin, profile_photo_path)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password, is_admin, profile_photo_path,
                      created_at, updated_at
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.password)
        .bind(payload.is_admin)
        .bind(&payload.profile_photo_path)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }

    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, is_admin, profile_photo_path,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }

    async fn find_all(&self, page: Page) -> DatabaseResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, is_admin, profile_photo_path,
                   created_at, updated_at
            FROM users
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

    async fn find_by_filter(&self, filter: &SearchFilter) -> DatabaseResult<Vec<User>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, name, email, password, is_admin, profile_photo_path, \
             created_at, updated_at FROM users",
        );
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY id");

        builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::query)
    }

    async fn update(&self, id: i32, payload: &UserPayload) -> DatabaseResult<Option<User>> {
        info!("Updating user: {}", id);

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $1, email = $2, password = $3, is_admin = $4,
                profile_photo_path = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING id, name, email, password, is_admin, profile_photo_path,
                      created_at, updated_at
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.password)
        .bind(payload.is_admin)
        .bind(&payload.profile_photo_path)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::query)
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        info!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::query)?;

        Ok(result.rows_affected() > 0)
    }
}
