//! Core logic for DailyDose.
//! Fetches a quote of the day, caches it locally and degrades gracefully
//! to cached or built-in quotes when the remote source is unavailable.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod source;

pub use config::{ConfigError, DailyDoseConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::quote::{today_string, NewQuote, Quote, QuoteId, QuoteValidationError};
pub use repo::quote_store::{
    QuoteFeed, QuoteFilter, QuoteStore, SqliteQuoteStore, StoreError, StoreResult,
};
pub use service::daily_quote::{Advisory, DailyQuoteService, DisplayedQuote, QuoteError};
pub use service::history::HistoryService;
pub use service::seed::{seed_defaults, DEFAULT_QUOTES};
pub use source::{QuoteCandidate, QuoteSource, SourceError, SourceResult, ZenQuotesSource};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
