//! Observable per-consumer view state.
//!
//! # Responsibility
//! - Hold the current quote, loading flag and message as watch channels.
//! - Guarantee the loading flag is reset on every exit path.

use crate::model::quote::Quote;
use tokio::sync::watch;

/// Current quote, loading flag and message for one consumer.
///
/// Writes use `send_replace`, so values are retained even while nobody
/// is subscribed. Last write wins.
pub struct QuoteViewState {
    current: watch::Sender<Option<Quote>>,
    loading: watch::Sender<bool>,
    message: watch::Sender<Option<String>>,
}

impl QuoteViewState {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        let (loading, _) = watch::channel(false);
        let (message, _) = watch::channel(None);
        Self {
            current,
            loading,
            message,
        }
    }

    pub fn current(&self) -> Option<Quote> {
        self.current.borrow().clone()
    }

    pub fn set_current(&self, quote: Option<Quote>) {
        self.current.send_replace(quote);
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn message(&self) -> Option<String> {
        self.message.borrow().clone()
    }

    pub fn set_message(&self, message: Option<String>) {
        self.message.send_replace(message);
    }

    pub fn clear_message(&self) {
        self.set_message(None);
    }

    pub fn subscribe_current(&self) -> watch::Receiver<Option<Quote>> {
        self.current.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn subscribe_message(&self) -> watch::Receiver<Option<String>> {
        self.message.subscribe()
    }

    /// Marks an operation as started: loading on, message cleared.
    ///
    /// Loading switches off when the returned guard drops, including
    /// during unwinding.
    pub fn begin_loading(&self) -> LoadingGuard<'_> {
        self.clear_message();
        self.loading.send_replace(true);
        LoadingGuard {
            loading: &self.loading,
        }
    }
}

impl Default for QuoteViewState {
    fn default() -> Self {
        Self::new()
    }
}

/// Resets the loading flag on drop.
pub struct LoadingGuard<'a> {
    loading: &'a watch::Sender<bool>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.loading.send_replace(false);
    }
}

#[cfg(test)]
mod tests {
    use super::QuoteViewState;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn guard_toggles_loading_and_clears_message() {
        let state = QuoteViewState::new();
        state.set_message(Some("stale".to_string()));
        let loading = state.subscribe_loading();

        {
            let _guard = state.begin_loading();
            assert!(state.is_loading());
            assert!(*loading.borrow());
            assert_eq!(state.message(), None);
        }

        assert!(!state.is_loading());
    }

    #[test]
    fn loading_resets_when_operation_panics() {
        let state = QuoteViewState::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = state.begin_loading();
            panic!("boom");
        }));

        assert!(result.is_err());
        assert!(!state.is_loading());
    }
}
