//! Input validation for create and update request bodies
//!
//! Each validator takes the raw JSON body and either returns the typed
//! payload the repositories accept or the first rule it broke. A value is
//! "falsy" when it is missing, `null`, `false`, zero or the empty string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::{NewsPayload, UserPayload};

/// Reasons a request body is rejected before any store call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty
    #[error("{0}")]
    MissingField(String),

    /// A field has the right type but the wrong shape
    #[error("{0}")]
    InvalidFormat(String),

    /// A field has the wrong JSON type
    #[error("{0}")]
    InvalidType(String),
}

fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

fn invalid_value(field: &str) -> String {
    format!("Invalid value for {} field", field)
}

fn required_string(body: &Value, field: &str) -> Result<String, ValidationError> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ValidationError::InvalidType(invalid_value(field)))
}

/// Optional string field: falsy values read as absent, other non-strings are rejected
fn optional_string(body: &Value, field: &str) -> Result<Option<String>, ValidationError> {
    match body.get(field) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        value if is_falsy(value) => Ok(None),
        _ => Err(ValidationError::InvalidType(invalid_value(field))),
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("Failed to compile email regex"))
}

fn name_regex() -> &'static Regex {
    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    NAME_REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z\s]*$").expect("Failed to compile name regex"))
}

/// Validate a user body
///
/// `is_admin` must be a JSON boolean even though the column has a default:
/// a body that leaves it out is rejected.
pub fn validate_user(body: &Value) -> Result<UserPayload, ValidationError> {
    if ["name", "email", "password"]
        .iter()
        .any(|field| is_falsy(body.get(*field)))
    {
        return Err(ValidationError::MissingField(
            "Name, email, and password are required".to_string(),
        ));
    }

    let name = required_string(body, "name")?;
    let email = required_string(body, "email")?;
    let password = required_string(body, "password")?;

    if !email_regex().is_match(&email) {
        return Err(ValidationError::InvalidFormat(
            "Invalid email format".to_string(),
        ));
    }

    let is_admin = match body.get("is_admin") {
        Some(Value::Bool(b)) => *b,
        _ => return Err(ValidationError::InvalidType(invalid_value("is_admin"))),
    };

    let profile_photo_path = optional_string(body, "profile_photo_path")?;

    if !name_regex().is_match(&name) {
        return Err(ValidationError::InvalidFormat(
            "Name cannot contain numbers".to_string(),
        ));
    }

    Ok(UserPayload {
        name,
        email,
        password,
        is_admin,
        profile_photo_path,
    })
}

/// Validate a news body
pub fn validate_news(body: &Value) -> Result<NewsPayload, ValidationError> {
    if is_falsy(body.get("title")) || is_falsy(body.get("content")) {
        return Err(ValidationError::MissingField(
            "Title and content are required".to_string(),
        ));
    }

    let title = required_string(body, "title")?;
    let content = required_string(body, "content")?;
    let cover_image = optional_string(body, "cover_image")?;
    let publish_date = publish_date(body.get("publish_date"))?;

    Ok(NewsPayload {
        title,
        content,
        cover_image,
        publish_date,
    })
}

fn publish_date(value: Option<&Value>) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let invalid = || ValidationError::InvalidFormat(invalid_value("publish_date"));

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_timestamp(s.trim()).map(Some).ok_or_else(invalid),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .map(Some)
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
