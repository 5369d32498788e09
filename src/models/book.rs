//! Book record model and related types.
//!
//! Field names follow the camelCase JSON contract of the bookshelf API.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::error::BookError;

/// Full book record as stored and returned by `GET /books/{bookId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Random 16-character identifier
    pub id: String,
    pub name: String,
    /// Stored exactly as sent
    #[schema(value_type = Option<Object>)]
    pub year: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub author: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub summary: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub publisher: Option<Value>,
    /// Total number of pages
    pub page_count: u32,
    /// Pages read so far, never greater than `page_count`
    pub read_page: u32,
    /// Derived: `read_page == page_count` at the last write
    pub finished: bool,
    pub reading: bool,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a new record from an already validated payload.
    pub fn new(id: String, payload: BookPayload, now: DateTime<Utc>) -> Self {
        let mut book = Self {
            id,
            name: String::new(),
            year: None,
            author: None,
            summary: None,
            publisher: None,
            page_count: 0,
            read_page: 0,
            finished: false,
            reading: false,
            inserted_at: now,
            updated_at: now,
        };
        book.apply(payload, now);
        book
    }

    /// Replace every mutable field, keeping `id` and `inserted_at`.
    pub fn apply(&mut self, payload: BookPayload, now: DateTime<Utc>) {
        self.name = payload.name.unwrap_or_default();
        self.year = payload.year;
        self.author = payload.author;
        self.summary = payload.summary;
        self.publisher = payload.publisher;
        self.page_count = payload.page_count;
        self.read_page = payload.read_page;
        self.reading = payload.reading;
        self.finished = self.page_count == self.read_page;
        self.updated_at = now;
    }
}

/// Current time at the precision the API exposes (milliseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Create / update book request.
///
/// `finished`, `id` and the timestamps are not part of the payload; any such
/// keys sent by a client are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_page_bounds"))]
pub struct BookPayload {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    /// Free-form; text or number
    #[schema(value_type = Option<Object>)]
    pub year: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub author: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub summary: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub publisher: Option<Value>,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub read_page: u32,
    #[serde(default)]
    pub reading: bool,
}

fn validate_page_bounds(payload: &BookPayload) -> Result<(), ValidationError> {
    if payload.read_page > payload.page_count {
        return Err(ValidationError::new("page_overflow"));
    }
    Ok(())
}

impl BookPayload {
    /// Run the write-time rules. A name error always wins over a page error.
    pub fn check(&self) -> Result<(), BookError> {
        match self.validate() {
            Ok(()) => Ok(()),
            Err(errors) if errors.field_errors().contains_key("name") => {
                Err(BookError::MissingName)
            }
            Err(_) => Err(BookError::PageOverflow),
        }
    }
}

/// Projection returned by `GET /books`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    #[schema(value_type = Option<Object>)]
    pub publisher: Option<Value>,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Query parameters of `GET /books`
///
/// Every parameter may be repeated; only its first value is used.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub name: Vec<String>,
    /// Numeric flag, `1` or `0`
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub reading: Vec<String>,
    /// Numeric flag, `1` or `0`
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub finished: Vec<String>,
}

/// The single filter applied by a list query.
///
/// Only one criterion is ever active: `name` overrides `reading`, which
/// overrides `finished`. A flag value that is neither 0 nor 1 is kept as
/// `None` and matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    All,
    Name(String),
    Reading(Option<bool>),
    Finished(Option<bool>),
}

impl From<&BookQuery> for BookFilter {
    fn from(query: &BookQuery) -> Self {
        fn present(values: &[String]) -> Option<&str> {
            values.first().map(String::as_str).filter(|v| !v.is_empty())
        }

        if let Some(name) = present(&query.name) {
            BookFilter::Name(name.to_lowercase())
        } else if let Some(reading) = present(&query.reading) {
            BookFilter::Reading(parse_flag(reading))
        } else if let Some(finished) = present(&query.finished) {
            BookFilter::Finished(parse_flag(finished))
        } else {
            BookFilter::All
        }
    }
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::Name(needle) => book.name.to_lowercase().contains(needle.as_str()),
            BookFilter::Reading(flag) => *flag == Some(book.reading),
            BookFilter::Finished(flag) => *flag == Some(book.finished),
        }
    }
}

/// Coerce a query flag into a boolean through its numeric value.
///
/// Blank input counts as 0. Decimal, exponent and `0x`/`0o`/`0b` forms are
/// accepted; any number other than 0 or 1, and any non-number, yields `None`.
pub fn parse_flag(value: &str) -> Option<bool> {
    let trimmed = value.trim();
    let number = if trimmed.is_empty() {
        0.0
    } else {
        parse_number(trimmed)?
    };

    if number == 1.0 {
        Some(true)
    } else if number == 0.0 {
        Some(false)
    } else {
        None
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let radix = match value.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return value.parse::<f64>().ok(),
    };
    u64::from_str_radix(&value[2..], radix).ok().map(|n| n as f64)
}
