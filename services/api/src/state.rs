//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    models::{News, NewsPayload, User, UserPayload},
    repositories::Repository,
};

/// Handle to whichever user store the service was started with
pub type UserStore = Arc<dyn Repository<Record = User, Payload = UserPayload>>;

/// Handle to whichever news store the service was started with
pub type NewsStore = Arc<dyn Repository<Record = News, Payload = NewsPayload>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repository: UserStore,
    pub news_repository: NewsStore,
}
