//! Daily quote use-case service.
//!
//! # Responsibility
//! - Run the fetch -> normalize -> insert-if-absent -> read-back pipeline.
//! - Fall back from remote to latest cached quote to seeded defaults.
//! - Pick a different quote on demand without repeating the current one.
//! - Mirror every outcome into the consumer's observable view state.
//!
//! # Invariants
//! - Only the first candidate of a successful fetch is used.
//! - The loading flag is false after every operation, whatever the path.
//! - Anti-repeat compares trimmed text, not identifiers.
//! - Overlapping operations are not serialized here; the last completed
//!   write to the current quote wins.

use crate::model::quote::{today_string, NewQuote, Quote};
use crate::repo::quote_store::{QuoteStore, StoreError};
use crate::service::seed::seed_defaults;
use crate::service::selection::pick_different;
use crate::service::view_state::QuoteViewState;
use crate::source::QuoteSource;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Message used when the remote answered without a usable candidate.
pub const REMOTE_EMPTY_MESSAGE: &str = "API temporarily unavailable";
/// Message used when no distinct quote can be shown.
pub const NO_QUOTES_MESSAGE: &str = "No quotes available";

/// Non-fatal note attached to a degraded but successful result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// Remote failed; showing the latest cached quote.
    OfflineLatest,
    /// Remote failed; showing a random cached quote.
    OfflineRandom,
}

impl Advisory {
    pub fn message(self) -> &'static str {
        match self {
            Self::OfflineLatest => "Showing offline quote",
            Self::OfflineRandom => "Showing random quote (offline)",
        }
    }
}

impl Display for Advisory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Successful terminal state of a quote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedQuote {
    pub quote: Quote,
    pub advisory: Option<Advisory>,
}

impl DisplayedQuote {
    fn fresh(quote: Quote) -> Self {
        Self {
            quote,
            advisory: None,
        }
    }

    fn degraded(quote: Quote, advisory: Advisory) -> Self {
        Self {
            quote,
            advisory: Some(advisory),
        }
    }
}

/// Failed terminal state of a quote operation.
///
/// Callers branch on the variant; the text is only for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// Fetch failed or returned no usable candidate. Store failures are
    /// reported here too, with their message unchanged.
    RemoteUnavailable(String),
    /// Nothing cached and seeding did not help.
    EmptyStore(String),
    /// No quote distinct from the current one exists.
    NoAlternative,
}

impl Display for QuoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemoteUnavailable(message) | Self::EmptyStore(message) => {
                f.write_str(message)
            }
            Self::NoAlternative => f.write_str(NO_QUOTES_MESSAGE),
        }
    }
}

impl Error for QuoteError {}

impl From<StoreError> for QuoteError {
    fn from(value: StoreError) -> Self {
        Self::RemoteUnavailable(value.to_string())
    }
}

/// Fetch-cache-fallback and selection policy for one consumer.
///
/// Store and source are injected; the service owns only its view state.
pub struct DailyQuoteService<S: QuoteStore + ?Sized, Q: QuoteSource + ?Sized> {
    store: Arc<S>,
    source: Arc<Q>,
    state: QuoteViewState,
    today: fn() -> String,
}

impl<S: QuoteStore + ?Sized, Q: QuoteSource + ?Sized> DailyQuoteService<S, Q> {
    pub fn new(store: Arc<S>, source: Arc<Q>) -> Self {
        Self {
            store,
            source,
            state: QuoteViewState::new(),
            today: today_string,
        }
    }

    /// Replaces the clock used to stamp `date_fetched`.
    pub fn with_clock(mut self, today: fn() -> String) -> Self {
        self.today = today;
        self
    }

    /// Shows today's quote, falling back to the cache and then to defaults.
    pub fn load(&self) -> Result<DisplayedQuote, QuoteError> {
        self.run("quote_load", || match self.fetch_remote() {
            Ok(quote) => Ok(DisplayedQuote::fresh(quote)),
            Err(remote_err) => self.load_fallback(remote_err),
        })
    }

    /// Re-fetches on user demand; offline it shows a different cached quote.
    ///
    /// When the store is empty, defaults are seeded and the selection policy
    /// still runs, so a refresh never just re-shows `latest()`.
    pub fn refresh(&self) -> Result<DisplayedQuote, QuoteError> {
        self.run("quote_refresh", || match self.fetch_remote() {
            Ok(quote) => Ok(DisplayedQuote::fresh(quote)),
            Err(remote_err) => {
                info!(
                    "event=quote_refresh module=service status=fallback reason={}",
                    remote_err
                );
                let quote = self.select_different(remote_err.to_string())?;
                Ok(DisplayedQuote::degraded(quote, Advisory::OfflineRandom))
            }
        })
    }

    /// Shows a cached quote different from the current one.
    pub fn show_random(&self) -> Result<DisplayedQuote, QuoteError> {
        self.run("quote_random", || {
            self.select_different(NO_QUOTES_MESSAGE.to_string())
                .map(DisplayedQuote::fresh)
        })
    }

    /// Flips the favorite flag, persists it and shows the updated quote.
    pub fn toggle_favorite(&self, quote: &Quote) -> Result<Quote, QuoteError> {
        let updated = quote.with_favorite(!quote.is_favorite);
        match self.store.update(&updated) {
            Ok(()) => {
                info!(
                    "event=quote_favorite module=service status=ok id={} favorite={}",
                    updated.id, updated.is_favorite
                );
                self.state.set_current(Some(updated.clone()));
                Ok(updated)
            }
            Err(err) => {
                warn!(
                    "event=quote_favorite module=service status=error id={} error={}",
                    quote.id, err
                );
                let err = QuoteError::from(err);
                self.state.set_message(Some(err.to_string()));
                Err(err)
            }
        }
    }

    /// Removes a quote. Feeds observe the change through the store.
    pub fn delete(&self, quote: &Quote) -> Result<(), QuoteError> {
        self.store.delete(quote).map_err(|err| {
            warn!(
                "event=quote_delete module=service status=error id={} error={}",
                quote.id, err
            );
            QuoteError::from(err)
        })?;
        info!("event=quote_delete module=service status=ok id={}", quote.id);
        Ok(())
    }

    /// Quote currently shown to this consumer.
    pub fn current(&self) -> Option<Quote> {
        self.state.current()
    }

    /// Sets the quote this consumer is showing (e.g. restored from a
    /// previous session) so selection can avoid it.
    pub fn set_current(&self, quote: Option<Quote>) {
        self.state.set_current(quote);
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn message(&self) -> Option<String> {
        self.state.message()
    }

    pub fn clear_message(&self) {
        self.state.clear_message();
    }

    pub fn subscribe_current(&self) -> watch::Receiver<Option<Quote>> {
        self.state.subscribe_current()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.state.subscribe_loading()
    }

    pub fn subscribe_message(&self) -> watch::Receiver<Option<String>> {
        self.state.subscribe_message()
    }

    fn run(
        &self,
        event: &str,
        operation: impl FnOnce() -> Result<DisplayedQuote, QuoteError>,
    ) -> Result<DisplayedQuote, QuoteError> {
        let started_at = Instant::now();
        let _loading = self.state.begin_loading();
        info!("event={event} module=service status=start");

        let result = operation();
        match &result {
            Ok(displayed) => {
                self.state.set_current(Some(displayed.quote.clone()));
                self.state
                    .set_message(displayed.advisory.map(|advisory| advisory.to_string()));
                info!(
                    "event={event} module=service status=ok duration_ms={} id={} advisory={}",
                    started_at.elapsed().as_millis(),
                    displayed.quote.id,
                    displayed.advisory.is_some()
                );
            }
            Err(err) => {
                self.state.set_message(Some(err.to_string()));
                warn!(
                    "event={event} module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
            }
        }
        result
    }

    /// Fetches, normalizes and stores the first candidate, then reads it back.
    fn fetch_remote(&self) -> Result<Quote, QuoteError> {
        let candidates = self
            .source
            .fetch_daily()
            .map_err(|err| QuoteError::RemoteUnavailable(err.to_string()))?;

        let Some(first) = candidates.into_iter().next() else {
            return Err(QuoteError::RemoteUnavailable(
                REMOTE_EMPTY_MESSAGE.to_string(),
            ));
        };

        let new_quote = NewQuote::new(&first.text, &first.author, (self.today)());
        if let Err(err) = new_quote.validate() {
            return Err(QuoteError::RemoteUnavailable(format!(
                "{REMOTE_EMPTY_MESSAGE}: {err}"
            )));
        }

        self.store.insert_if_absent(&new_quote)?;
        self.store
            .find_by_text(&new_quote.text)?
            .ok_or_else(|| {
                QuoteError::RemoteUnavailable(
                    "fetched quote missing after insert".to_string(),
                )
            })
    }

    fn load_fallback(&self, remote_err: QuoteError) -> Result<DisplayedQuote, QuoteError> {
        info!(
            "event=quote_load module=service status=fallback reason={}",
            remote_err
        );

        if let Some(latest) = self.store.latest()? {
            return Ok(DisplayedQuote::degraded(latest, Advisory::OfflineLatest));
        }

        seed_defaults(self.store.as_ref(), &(self.today)())?;
        match self.store.latest()? {
            Some(seeded) => Ok(DisplayedQuote::fresh(seeded)),
            None => Err(QuoteError::EmptyStore(remote_err.to_string())),
        }
    }

    /// Selection policy: seed when empty, then pick a distinct-text quote.
    fn select_different(&self, empty_reason: String) -> Result<Quote, QuoteError> {
        if self.store.count()? == 0 {
            seed_defaults(self.store.as_ref(), &(self.today)())?;
            if self.store.count()? == 0 {
                return Err(QuoteError::EmptyStore(empty_reason));
            }
        }

        let quotes = self.store.list_all()?;
        let current = self.state.current();
        let mut rng = rand::thread_rng();
        pick_different(&quotes, current.as_ref(), &mut rng)
            .cloned()
            .ok_or(QuoteError::NoAlternative)
    }
}
