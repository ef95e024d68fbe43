//! Quote domain model.
//!
//! # Responsibility
//! - Define persisted (`Quote`) and unsaved (`NewQuote`) quote shapes.
//! - Validate text/author/date before they reach storage.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes afterwards.
//! - `text` and `author` are non-empty after trimming.
//! - `date_fetched` is a calendar date formatted as `YYYY-MM-DD`.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier (SQLite rowid).
pub type QuoteId = i64;

/// Date format used for `date_fetched`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validation failures for quote fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteValidationError {
    EmptyText,
    EmptyAuthor,
    InvalidDate(String),
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text must not be empty"),
            Self::EmptyAuthor => write!(f, "quote author must not be empty"),
            Self::InvalidDate(value) => {
                write!(f, "date_fetched `{value}` is not a YYYY-MM-DD date")
            }
        }
    }
}

impl Error for QuoteValidationError {}

/// Persisted quote record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Stable store-assigned ID.
    pub id: QuoteId,
    /// Quote body, unique across the store.
    pub text: String,
    pub author: String,
    /// Local date at insertion time, `YYYY-MM-DD`.
    pub date_fetched: String,
    pub is_favorite: bool,
}

impl Quote {
    /// Returns a copy with the favorite flag replaced.
    ///
    /// Identity and all other fields are preserved.
    pub fn with_favorite(&self, is_favorite: bool) -> Self {
        Self {
            is_favorite,
            ..self.clone()
        }
    }

    /// Returns whether this quote's trimmed text equals `text` trimmed.
    pub fn has_same_text(&self, text: &str) -> bool {
        self.text.trim() == text.trim()
    }

    /// Validates mutable fields before persistence.
    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        validate_fields(&self.text, &self.author, &self.date_fetched)
    }
}

/// Quote that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    pub text: String,
    pub author: String,
    pub date_fetched: String,
}

impl NewQuote {
    /// Creates an unsaved quote, trimming text and author.
    pub fn new(
        text: impl AsRef<str>,
        author: impl AsRef<str>,
        date_fetched: impl Into<String>,
    ) -> Self {
        Self {
            text: text.as_ref().trim().to_string(),
            author: author.as_ref().trim().to_string(),
            date_fetched: date_fetched.into(),
        }
    }

    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        validate_fields(&self.text, &self.author, &self.date_fetched)
    }
}

/// Formats today's local calendar date as `YYYY-MM-DD`.
pub fn today_string() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

fn validate_fields(
    text: &str,
    author: &str,
    date_fetched: &str,
) -> Result<(), QuoteValidationError> {
    if text.trim().is_empty() {
        return Err(QuoteValidationError::EmptyText);
    }
    if author.trim().is_empty() {
        return Err(QuoteValidationError::EmptyAuthor);
    }
    if NaiveDate::parse_from_str(date_fetched, DATE_FORMAT).is_err() {
        return Err(QuoteValidationError::InvalidDate(date_fetched.to_string()));
    }
    Ok(())
}
