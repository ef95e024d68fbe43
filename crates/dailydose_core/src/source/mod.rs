//! Remote quote source contract and implementations.
//!
//! # Responsibility
//! - Define the fetch contract the policy layer depends on.
//! - Keep transport details (HTTP, JSON shape) out of the service layer.
//!
//! # Invariants
//! - Candidates are returned raw; callers own trimming and validation.
//! - Implementations own their timeout policy.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod zen_quotes;

pub use zen_quotes::{ZenQuotesSource, DEFAULT_BASE_URL};

pub type SourceResult<T> = Result<T, SourceError>;

/// Quote-like record returned by a source before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteCandidate {
    pub text: String,
    pub author: String,
}

impl QuoteCandidate {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

/// Failure reported by a quote source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Transport failure (DNS, connect, timeout, body read).
    Network(String),
    /// Remote answered with a non-success status code.
    HttpStatus(u16),
    /// Body could not be decoded into candidates.
    Decode(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) | Self::Decode(message) => {
                write!(f, "Network error: {message}")
            }
            Self::HttpStatus(code) => write!(f, "API temporarily unavailable (HTTP {code})"),
        }
    }
}

impl Error for SourceError {}

/// Remote daily-quote fetch operation.
pub trait QuoteSource: Send + Sync {
    /// Fetches today's candidates. An empty `Ok` means no usable quote.
    fn fetch_daily(&self) -> SourceResult<Vec<QuoteCandidate>>;
}
