//! Quote history use-case service.
//!
//! # Responsibility
//! - Expose ordered all/favorites feeds for history views.
//! - Track the favorites-only filter for one consumer.
//! - Forward favorite toggles and deletions to the store.
//!
//! # Invariants
//! - Feeds refresh through store notifications, never through this service.

use crate::model::quote::Quote;
use crate::repo::quote_store::{QuoteFeed, QuoteFilter, QuoteStore, StoreResult};
use log::info;
use std::sync::Arc;
use tokio::sync::watch;

/// History view facade over a quote store.
pub struct HistoryService<S: QuoteStore + ?Sized> {
    store: Arc<S>,
    favorites_only: watch::Sender<bool>,
}

impl<S: QuoteStore + ?Sized> HistoryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        let (favorites_only, _) = watch::channel(false);
        Self {
            store,
            favorites_only,
        }
    }

    /// All quotes, most recently fetched first.
    pub fn all_quotes(&self) -> StoreResult<QuoteFeed> {
        self.store.all_ordered()
    }

    /// Favorite quotes, most recently fetched first.
    pub fn favorite_quotes(&self) -> StoreResult<QuoteFeed> {
        self.store.favorites_ordered()
    }

    /// Feed matching the current favorites-only filter.
    pub fn visible_quotes(&self) -> StoreResult<QuoteFeed> {
        self.store.observe(self.filter())
    }

    pub fn show_favorites_only(&self) -> bool {
        *self.favorites_only.borrow()
    }

    /// Flips the favorites-only filter and returns the new value.
    pub fn toggle_favorite_filter(&self) -> bool {
        let next = !self.show_favorites_only();
        self.favorites_only.send_replace(next);
        next
    }

    pub fn subscribe_filter(&self) -> watch::Receiver<bool> {
        self.favorites_only.subscribe()
    }

    /// Flips and persists the favorite flag of `quote`.
    pub fn toggle_favorite_status(&self, quote: &Quote) -> StoreResult<Quote> {
        let updated = quote.with_favorite(!quote.is_favorite);
        self.store.update(&updated)?;
        Ok(updated)
    }

    pub fn delete_quote(&self, quote: &Quote) -> StoreResult<()> {
        self.store.delete(quote)
    }

    /// Removes every stored quote.
    pub fn clear_all(&self) -> StoreResult<()> {
        self.store.delete_all()?;
        info!("event=quote_clear module=service status=ok");
        Ok(())
    }

    fn filter(&self) -> QuoteFilter {
        if self.show_favorites_only() {
            QuoteFilter::FavoritesOnly
        } else {
            QuoteFilter::All
        }
    }
}
