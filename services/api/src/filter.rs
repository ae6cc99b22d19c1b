//! Search filters built from the `criteria` query parameter
//!
//! A filter is a conjunction of conditions, each requiring a column to
//! contain a term as a case-insensitive substring. Building and evaluating a
//! filter does not depend on the storage driver: the Postgres repositories
//! render it as `ILIKE` clauses, the in-memory ones call [`SearchFilter::matches`].

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

/// Reasons the `criteria` parameter cannot become a filter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Search criteria must be provided as an array")]
    NotAnArray,

    #[error("Search criterion {0} must have a string field and a scalar term")]
    MalformedCriterion(usize),

    #[error("Unknown search field: {0}")]
    UnknownField(String),
}

const CRITERIA: &str = "criteria";

/// One `column contains term` condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Column name, always one of the record's searchable columns
    pub column: &'static str,
    pub term: String,
}

impl Condition {
    /// `LIKE` pattern matching the term anywhere, with wildcards in the term escaped
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.term.len() + 2);
        pattern.push('%');
        for c in self.term.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// Conjunctive case-insensitive substring filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    conditions: Vec<Condition>,
}

impl SearchFilter {
    /// Parse the raw `criteria` parameter against a record's searchable columns
    pub fn parse(raw: Option<&str>, columns: &[&'static str]) -> Result<Self, FilterError> {
        let raw = raw.ok_or(FilterError::NotAnArray)?;
        let value: Value = serde_json::from_str(raw).map_err(|_| FilterError::NotAnArray)?;
        Self::from_value(&value, columns)
    }

    /// Build a filter from the decoded query pairs of a search request
    ///
    /// `criteria` is either one JSON array parameter
    /// (`criteria=[{"field":"name","term":"an"}]`) or indexed bracket keys
    /// (`criteria[0][field]=name&criteria[0][term]=an`). The JSON form wins
    /// when both are present.
    pub fn from_query(
        pairs: &[(String, String)],
        columns: &[&'static str],
    ) -> Result<Self, FilterError> {
        if let Some((_, raw)) = pairs.iter().find(|(key, _)| key == CRITERIA) {
            return Self::parse(Some(raw), columns);
        }

        let mut entries: BTreeMap<usize, Map<String, Value>> = BTreeMap::new();
        let mut bracketed = false;
        for (key, value) in pairs {
            let Some(rest) = key.strip_prefix(CRITERIA) else {
                continue;
            };
            if !rest.starts_with('[') {
                continue;
            }
            bracketed = true;

            let (index, property) = bracket_key(rest).ok_or(FilterError::NotAnArray)?;
            entries
                .entry(index)
                .or_default()
                .insert(property.to_string(), Value::String(value.clone()));
        }

        if !bracketed {
            return Err(FilterError::NotAnArray);
        }

        // Gaps in the indices are dropped, the remaining entries keep their order
        let criteria = entries.into_values().map(Value::Object).collect();
        Self::from_value(&Value::Array(criteria), columns)
    }

    /// Build a filter from an already decoded criteria array
    pub fn from_value(value: &Value, columns: &[&'static str]) -> Result<Self, FilterError> {
        let criteria = value.as_array().ok_or(FilterError::NotAnArray)?;

        let conditions = criteria
            .iter()
            .enumerate()
            .map(|(index, criterion)| {
                let field = criterion
                    .get("field")
                    .and_then(Value::as_str)
                    .ok_or(FilterError::MalformedCriterion(index))?;
                let term = match criterion.get("term") {
                    Some(Value::String(s)) => s.clone(),
                    Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
                    _ => return Err(FilterError::MalformedCriterion(index)),
                };
                let column = columns
                    .iter()
                    .copied()
                    .find(|column| *column == field)
                    .ok_or_else(|| FilterError::UnknownField(field.to_string()))?;

                Ok(Condition { column, term })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { conditions })
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluate the filter against a record
    ///
    /// `text_of` returns the text form of a column, or `None` when it is null.
    /// A null column never matches.
    pub fn matches<F>(&self, text_of: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        self.conditions.iter().all(|condition| {
            text_of(condition.column)
                .map(|text| {
                    text.to_lowercase()
                        .contains(&condition.term.to_lowercase())
                })
                .unwrap_or(false)
        })
    }
}

/// Split `[<index>][<property>]` into its parts
fn bracket_key(rest: &str) -> Option<(usize, &str)> {
    let (index, rest) = rest.strip_prefix('[')?.split_once(']')?;
    let property = rest.strip_prefix('[')?.strip_suffix(']')?;
    if property.is_empty() || property.contains(['[', ']']) {
        return None;
    }
    Some((index.parse().ok()?, property))
}
