//! User resource handlers

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use super::{parse_body, parse_id, query_params, store_failure};
use crate::{
    error::{ApiError, ApiResult},
    filter::SearchFilter,
    models::User,
    repositories::{Page, PageQuery},
    state::AppState,
    validation::validate_user,
};

const NOT_FOUND: &str = "User not found";

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let payload = validate_user(&parse_body(&body)?)?;

    let user = state
        .user_repository
        .create(&payload)
        .await
        .map_err(store_failure("Failed to create user"))?;

    info!("Created user {}", user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

/// List users, `limit` (default 10) starting at `offset` (default 0)
pub async fn get_users(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let page: Page = query_params(query)?.into();

    let users = state
        .user_repository
        .find_all(page)
        .await
        .map_err(store_failure("Failed to get users"))?;

    Ok(Json(users))
}

/// Search users by case-insensitive substring on one or more fields
pub async fn search_users(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let pairs = query_params(query)?;
    let filter = SearchFilter::from_query(&pairs, User::SEARCH_COLUMNS)?;

    let users = state
        .user_repository
        .find_by_filter(&filter)
        .await
        .map_err(store_failure("Failed to search users"))?;

    Ok(Json(users))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, NOT_FOUND)?;

    let user = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(store_failure("Failed to get user"))?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(user))
}

/// Replace every field of a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let payload = validate_user(&parse_body(&body)?)?;
    let id = parse_id(&id, NOT_FOUND)?;

    let user = state
        .user_repository
        .update(id, &payload)
        .await
        .map_err(store_failure("Failed to update user"))?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(user))
}

/// Delete a user by ID
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, NOT_FOUND)?;

    let deleted = state
        .user_repository
        .delete(id)
        .await
        .map_err(store_failure("Failed to delete user"))?;

    if deleted {
        info!("Deleted user {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(NOT_FOUND.to_string()))
    }
}
