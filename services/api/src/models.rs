//! API models for request and response payloads

pub mod news;
pub mod user;

pub use news::{News, NewsPayload};
pub use user::{User, UserPayload};
