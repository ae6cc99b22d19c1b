//! News resource handlers

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
    models::News,
    repositories::{Page, PageQuery},
    state::AppState,
    validation::validate_news,
};

const NOT_FOUND: &str = "News item not found";

/// Create a news item
pub async fn create_news(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let payload = validate_news(&parse_body(&body)?)?;

    let news = state
        .news_repository
        .create(&payload)
        .await
        .map_err(store_failure("Failed to create news item"))?;

    info!("Created news item {}", news.id);
    Ok((StatusCode::CREATED, Json(news)))
}

/// List news items with pagination
pub async fn get_news_items(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let page: Page = query_params(query)?.into();

    let items = state
        .news_repository
        .find_all(page)
        .await
        .map_err(store_failure("Failed to get news items"))?;

    Ok(Json(items))
}

/// Search news items
pub async fn search_news(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let pairs = query_params(query)?;
    let filter = SearchFilter::from_query(&pairs, News::SEARCH_COLUMNS)?;

    let items = state
        .news_repository
        .find_by_filter(&filter)
        .await
        .map_err(store_failure("Failed to search news items"))?;

    Ok(Json(items))
}

/// Get a news item by ID
pub async fn get_news_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, NOT_FOUND)?;

    let news = state
        .news_repository
        .find_by_id(id)
        .await
        .map_err(store_failure("Failed to get news item"))?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(news))
}

/// Replace every field of a news item
pub async fn update_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let payload = validate_news(&parse_body(&body)?)?;
    let id = parse_id(&id, NOT_FOUND)?;

    let news = state
        .news_repository
        .update(id, &payload)
        .await
        .map_err(store_failure("Failed to update news item"))?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(news))
}

/// Delete a news item by ID
pub async fn delete_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, NOT_FOUND)?;

    let deleted = state
        .news_repository
        .delete(id)
        .await
        .map_err(store_failure("Failed to delete news item"))?;

    if !deleted {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    info!("Deleted news item {}", id);
    Ok(StatusCode::NO_CONTENT)
}
