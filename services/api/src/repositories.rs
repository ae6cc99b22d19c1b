//! Repositories for database operations
//!
//! Each record type gets one repository exposing the same six operations.
//! Handlers only see the [`Repository`] trait, so the Postgres-backed
//! implementations can be swapped for in-memory ones in tests.

use async_trait::async_trait;
use common::error::DatabaseResult;
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use crate::filter::SearchFilter;

pub mod news;
pub mod user;

#[cfg(test)]
pub mod memory;

pub use news::NewsRepository;
pub use user::UserRepository;

/// Default page size when `limit` is not given
pub const DEFAULT_LIMIT: i64 = 10;

/// Query parameters for listing records
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Resolved pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        Self {
            limit: query.limit.unwrap_or(DEFAULT_LIMIT).max(0),
            offset: query.offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        PageQuery::default().into()
    }
}

/// Storage operations for one record type
#[async_trait]
pub trait Repository: Send + Sync {
    /// Stored record, as returned to clients
    type Record: Send + 'static;
    /// Validated create/update body
    type Payload: Sync + 'static;

    /// Insert a new record and return it with its generated id
    async fn create(&self, payload: &Self::Payload) -> DatabaseResult<Self::Record>;

    /// Look a record up by primary key
    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<Self::Record>>;

    /// List records ordered by id
    async fn find_all(&self, page: Page) -> DatabaseResult<Vec<Self::Record>>;

    /// List records matching every condition of the filter, ordered by id
    async fn find_by_filter(&self, filter: &SearchFilter) -> DatabaseResult<Vec<Self::Record>>;

    /// Overwrite every data field of a record; `None` if the id does not exist
    async fn update(
        &self,
        id: i32,
        payload: &Self::Payload,
    ) -> DatabaseResult<Option<Self::Record>>;

    /// Remove a record; `false` if the id does not exist
    async fn delete(&self, id: i32) -> DatabaseResult<bool>;
}

/// Append a `WHERE` clause for the filter to a query
///
/// Columns come from the record's fixed column list, terms are bound.
pub(crate) fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &SearchFilter) {
    for (index, condition) in filter.conditions().iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });
        builder.push("CAST(");
        builder.push(condition.column);
        builder.push(" AS TEXT) ILIKE ");
        builder.push_bind(condition.like_pattern());
        builder.push(" ESCAPE '\\'");
    }
}
