//! In-memory repositories used by the router tests

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};

use super::{Page, Repository};
use crate::{
    filter::SearchFilter,
    models::{News, NewsPayload, User, UserPayload},
};

/// Timestamp text as Postgres prints `CAST(timestamptz AS TEXT)` in a UTC session
fn timestamp_text(at: &DateTime<Utc>) -> String {
    let mut text = at.format("%Y-%m-%d %H:%M:%S").to_string();
    let micros = at.timestamp_subsec_micros();
    if micros != 0 {
        text.push_str(format!(".{:06}", micros).trim_end_matches('0'));
    }
    text.push_str("+00");
    text
}

/// A record type the in-memory repository can hold
pub trait StoredRecord: Clone + Send + Sync + 'static {
    type Payload: Sync + 'static;

    fn build(id: i32, payload: &Self::Payload, now: DateTime<Utc>) -> Self;
    fn replace(&mut self, payload: &Self::Payload, now: DateTime<Utc>);
    fn id(&self) -> i32;
    /// Text form of a column, `None` for null
    fn column_text(&self, column: &str) -> Option<String>;
    /// Name of the unique constraint writing `payload` would break against this record
    fn conflicts_with(&self, _payload: &Self::Payload) -> Option<&'static str> {
        None
    }
}

impl StoredRecord for User {
    type Payload = UserPayload;

    fn build(id: i32, payload: &UserPayload, now: DateTime<Utc>) -> Self {
        User {
            id,
            name: payload.name.clone(),
            email: payload.email.clone(),
            password: payload.password.clone(),
            is_admin: payload.is_admin,
            profile_photo_path: payload.profile_photo_path.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn replace(&mut self, payload: &UserPayload, now: DateTime<Utc>) {
        *self = User {
            created_at: self.created_at,
            ..User::build(self.id, payload, now)
        };
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn column_text(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            "email" => Some(self.email.clone()),
            "password" => Some(self.password.clone()),
            "is_admin" => Some(self.is_admin.to_string()),
            "profile_photo_path" => self.profile_photo_path.clone(),
            "created_at" => Some(timestamp_text(&self.created_at)),
            "updated_at" => Some(timestamp_text(&self.updated_at)),
            _ => None,
        }
    }

    fn conflicts_with(&self, payload: &UserPayload) -> Option<&'static str> {
        (self.email == payload.email).then_some("users_email_key")
    }
}

impl StoredRecord for News {
    type Payload = NewsPayload;

    fn build(id: i32, payload: &NewsPayload, now: DateTime<Utc>) -> Self {
        News {
            id,
            title: payload.title.clone(),
            content: payload.content.clone(),
            cover_image: payload.cover_image.clone(),
            publish_date: payload.publish_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace(&mut self, payload: &NewsPayload, now: DateTime<Utc>) {
        *self = News {
            created_at: self.created_at,
            ..News::build(self.id, payload, now)
        };
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn column_text(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "title" => Some(self.title.clone()),
            "content" => Some(self.content.clone()),
            "cover_image" => self.cover_image.clone(),
            "publish_date" => self.publish_date.as_ref().map(timestamp_text),
            "created_at" => Some(timestamp_text(&self.created_at)),
            "updated_at" => Some(timestamp_text(&self.updated_at)),
            _ => None,
        }
    }
}

struct Table<R> {
    rows: Vec<R>,
    next_id: i32,
}

/// Repository keeping records in a vector ordered by id
pub struct MemoryRepository<R> {
    table: Mutex<Table<R>>,
    fail: bool,
}

impl<R: StoredRecord> MemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                rows: Vec::new(),
                next_id: 1,
            }),
            fail: false,
        }
    }

    /// A repository whose every operation fails like a lost connection
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    fn check(&self) -> DatabaseResult<()> {
        if self.fail {
            Err(DatabaseError::Query(sqlx::Error::PoolClosed))
        } else {
            Ok(())
        }
    }

    fn check_unique(
        table: &Table<R>,
        payload: &R::Payload,
        skip_id: Option<i32>,
    ) -> DatabaseResult<()> {
        let conflict = table
            .rows
            .iter()
            .filter(|row| Some(row.id()) != skip_id)
            .find_map(|row| row.conflicts_with(payload));

        match conflict {
            Some(constraint) => Err(DatabaseError::UniqueViolation {
                constraint: constraint.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<R: StoredRecord> Repository for MemoryRepository<R> {
    type Record = R;
    type Payload = R::Payload;

    async fn create(&self, payload: &R::Payload) -> DatabaseResult<R> {
        self.check()?;
        let mut table = self.table.lock().expect("memory table poisoned");
        Self::check_unique(&table, payload, None)?;

        let record = R::build(table.next_id, payload, Utc::now());
        table.next_id += 1;
        table.rows.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<R>> {
        self.check()?;
        let table = self.table.lock().expect("memory table poisoned");
        Ok(table.rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn find_all(&self, page: Page) -> DatabaseResult<Vec<R>> {
        self.check()?;
        let table = self.table.lock().expect("memory table poisoned");
        Ok(table
            .rows
            .iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn find_by_filter(&self, filter: &SearchFilter) -> DatabaseResult<Vec<R>> {
        self.check()?;
        let table = self.table.lock().expect("memory table poisoned");
        Ok(table
            .rows
            .iter()
            .filter(|row| filter.matches(|column| row.column_text(column)))
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, payload: &R::Payload) -> DatabaseResult<Option<R>> {
        self.check()?;
        let mut table = self.table.lock().expect("memory table poisoned");
        let Some(index) = table.rows.iter().position(|row| row.id() == id) else {
            return Ok(None);
        };
        Self::check_unique(&table, payload, Some(id))?;

        let row = &mut table.rows[index];
        row.replace(payload, Utc::now());
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i32) -> DatabaseResult<bool> {
        self.check()?;
        let mut table = self.table.lock().expect("memory table poisoned");
        let before = table.rows.len();
        table.rows.retain(|row| row.id() != id);
        Ok(table.rows.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn timestamps_render_like_postgres_text() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(timestamp_text(&at), "2024-03-01 09:00:00+00");

        let at = at + chrono::Duration::microseconds(120_000);
        assert_eq!(timestamp_text(&at), "2024-03-01 09:00:00.12+00");
    }

    #[test]
    fn publish_date_column_text_uses_database_form() {
        let payload = NewsPayload {
            title: "Launch".to_string(),
            content: "We shipped.".to_string(),
            cover_image: None,
            publish_date: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single(),
        };
        let news = News::build(1, &payload, Utc::now());

        assert_eq!(
            news.column_text("publish_date").as_deref(),
            Some("2024-03-01 09:00:00+00")
        );
        assert_eq!(news.column_text("cover_image"), None);
    }
}
