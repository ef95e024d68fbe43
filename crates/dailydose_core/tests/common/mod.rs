#![allow(dead_code)]

use dailydose_core::db::open_db_in_memory;
use dailydose_core::{
    NewQuote, Quote, QuoteCandidate, QuoteFeed, QuoteFilter, QuoteId, QuoteSource, QuoteStore,
    SourceError, SourceResult, SqliteQuoteStore, StoreError, StoreResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_DATE: &str = "2024-06-01";

pub fn test_today() -> String {
    TEST_DATE.to_string()
}

pub fn memory_store() -> Arc<SqliteQuoteStore> {
    Arc::new(SqliteQuoteStore::try_new(open_db_in_memory().unwrap()).unwrap())
}

pub fn insert(store: &SqliteQuoteStore, text: &str, author: &str, date: &str) -> Quote {
    store
        .insert_if_absent(&NewQuote::new(text, author, date))
        .unwrap();
    store.find_by_text(text.trim()).unwrap().unwrap()
}

/// Source returning a fixed, swappable response.
pub struct ScriptedSource {
    response: Mutex<SourceResult<Vec<QuoteCandidate>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn failing() -> Arc<Self> {
        Arc::new(Self::with(Err(SourceError::Network(
            "connection refused".to_string(),
        ))))
    }

    pub fn returning(candidates: Vec<QuoteCandidate>) -> Arc<Self> {
        Arc::new(Self::with(Ok(candidates)))
    }

    fn with(response: SourceResult<Vec<QuoteCandidate>>) -> Self {
        Self {
            response: Mutex::new(response),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_response(&self, response: SourceResult<Vec<QuoteCandidate>>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QuoteSource for ScriptedSource {
    fn fetch_daily(&self) -> SourceResult<Vec<QuoteCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.lock().unwrap().clone()
    }
}

/// Store whose every operation fails, or panics when `panics` is set.
pub struct BrokenStore {
    pub panics: bool,
}

pub const BROKEN_STORE_REASON: &str = "disk unavailable";

impl BrokenStore {
    fn fail<T>(&self) -> StoreResult<T> {
        if self.panics {
            panic!("store exploded");
        }
        Err(StoreError::InvalidData(BROKEN_STORE_REASON.to_string()))
    }
}

impl QuoteStore for BrokenStore {
    fn insert_if_absent(&self, _quote: &NewQuote) -> StoreResult<bool> {
        self.fail()
    }
    fn update(&self, _quote: &Quote) -> StoreResult<()> {
        self.fail()
    }
    fn delete(&self, _quote: &Quote) -> StoreResult<()> {
        self.fail()
    }
    fn delete_all(&self) -> StoreResult<()> {
        self.fail()
    }
    fn count(&self) -> StoreResult<usize> {
        self.fail()
    }
    fn list_all(&self) -> StoreResult<Vec<Quote>> {
        self.fail()
    }
    fn latest(&self) -> StoreResult<Option<Quote>> {
        self.fail()
    }
    fn random_one(&self) -> StoreResult<Option<Quote>> {
        self.fail()
    }
    fn find_by_text(&self, _text: &str) -> StoreResult<Option<Quote>> {
        self.fail()
    }
    fn find_by_id(&self, _id: QuoteId) -> StoreResult<Option<Quote>> {
        self.fail()
    }
    fn set_favorite(&self, _id: QuoteId, _is_favorite: bool) -> StoreResult<()> {
        self.fail()
    }
    fn observe(&self, _filter: QuoteFilter) -> StoreResult<QuoteFeed> {
        self.fail()
    }
}

/// Store that accepts writes but never keeps anything.
pub struct BlackHoleStore;

impl QuoteStore for BlackHoleStore {
    fn insert_if_absent(&self, _quote: &NewQuote) -> StoreResult<bool> {
        Ok(false)
    }
    fn update(&self, quote: &Quote) -> StoreResult<()> {
        Err(StoreError::NotFound(quote.id))
    }
    fn delete(&self, _quote: &Quote) -> StoreResult<()> {
        Ok(())
    }
    fn delete_all(&self) -> StoreResult<()> {
        Ok(())
    }
    fn count(&self) -> StoreResult<usize> {
        Ok(0)
    }
    fn list_all(&self) -> StoreResult<Vec<Quote>> {
        Ok(Vec::new())
    }
    fn latest(&self) -> StoreResult<Option<Quote>> {
        Ok(None)
    }
    fn random_one(&self) -> StoreResult<Option<Quote>> {
        Ok(None)
    }
    fn find_by_text(&self, _text: &str) -> StoreResult<Option<Quote>> {
        Ok(None)
    }
    fn find_by_id(&self, _id: QuoteId) -> StoreResult<Option<Quote>> {
        Ok(None)
    }
    fn set_favorite(&self, id: QuoteId, _is_favorite: bool) -> StoreResult<()> {
        Err(StoreError::NotFound(id))
    }
    fn observe(&self, _filter: QuoteFilter) -> StoreResult<QuoteFeed> {
        Err(StoreError::InvalidData("black hole store has no feeds".to_string()))
    }
}
