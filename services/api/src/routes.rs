//! API service routes

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, rejection::QueryRejection},
    response::IntoResponse,
    routing::{get, post},
};
use common::error::DatabaseError;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

pub mod news;
pub mod users;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/users", post(users::create_user).get(users::get_users))
        .route("/users/search", get(users::search_users))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/news", post(news::create_news).get(news::get_news_items))
        .route("/news/search", get(news::search_news))
        .route(
            "/news/:id",
            get(news::get_news_item)
                .put(news::update_news)
                .delete(news::delete_news),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness banner
pub async fn root() -> &'static str {
    "Server is running!"
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Decode a JSON request body; an empty body reads as `{}`
pub(crate) fn parse_body(body: &Bytes) -> ApiResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_slice(body).map_err(|_| ApiError::BadRequest("Invalid JSON body".to_string()))
}

/// Parse a path id; ids that are not integers cannot exist
pub(crate) fn parse_id(raw: &str, not_found: &str) -> ApiResult<i32> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(not_found.to_string()))
}

pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Log a failed store call under `context` and turn it into an API error
pub(crate) fn store_failure(context: &'static str) -> impl Fn(DatabaseError) -> ApiError {
    move |err| {
        if err.is_unique_violation() {
            warn!("{}: {}", context, err);
        } else {
            error!("{}: {}", context, err);
        }
        ApiError::from(err)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{send, test_app};
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn root_reports_running() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("Server is running!".to_string()));
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[test]
    fn parse_body_treats_empty_as_object() {
        assert_eq!(parse_body(&Bytes::new()).unwrap(), json!({}));
        assert_eq!(parse_body(&Bytes::from_static(b" \n")).unwrap(), json!({}));
        assert_eq!(
            parse_body(&Bytes::from_static(br#"{"a":1}"#)).unwrap(),
            json!({ "a": 1 })
        );
        assert!(matches!(
            parse_body(&Bytes::from_static(b"{nope")),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn parse_id_rejects_non_integers_as_not_found() {
        assert_eq!(parse_id("42", "User not found").unwrap(), 42);
        assert!(matches!(
            parse_id("abc", "User not found"),
            Err(ApiError::NotFound(msg)) if msg == "User not found"
        ));
    }
}
