mod common;

use common::{insert, memory_store, TEST_DATE};
use dailydose_core::{seed_defaults, QuoteStore, DEFAULT_QUOTES};

#[test]
fn seeding_empty_store_inserts_all_defaults_with_date() {
    let store = memory_store();

    let inserted = seed_defaults(store.as_ref(), TEST_DATE).unwrap();

    assert_eq!(inserted, DEFAULT_QUOTES.len());
    assert_eq!(store.count().unwrap(), 10);
    for (text, author) in DEFAULT_QUOTES {
        let quote = store.find_by_text(text).unwrap().unwrap();
        assert_eq!(quote.author, author);
        assert_eq!(quote.date_fetched, TEST_DATE);
        assert!(!quote.is_favorite);
    }
}

#[test]
fn seeding_non_empty_store_is_noop() {
    let store = memory_store();
    insert(&store, "Already here", "Someone", "2024-01-01");

    assert_eq!(seed_defaults(store.as_ref(), TEST_DATE).unwrap(), 0);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn seeding_twice_never_exceeds_seed_set() {
    let store = memory_store();

    let first = seed_defaults(store.as_ref(), TEST_DATE).unwrap();
    let second = seed_defaults(store.as_ref(), TEST_DATE).unwrap();

    assert_eq!(first + second, DEFAULT_QUOTES.len());
    assert_eq!(store.count().unwrap(), DEFAULT_QUOTES.len());
}

#[test]
fn default_quote_texts_are_distinct() {
    let mut texts: Vec<&str> = DEFAULT_QUOTES.iter().map(|(text, _)| *text).collect();
    texts.sort_unstable();
    texts.dedup();
    assert_eq!(texts.len(), 10);
}
