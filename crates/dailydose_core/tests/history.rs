mod common;

use common::{insert, memory_store};
use dailydose_core::{HistoryService, QuoteStore};

#[test]
fn feeds_are_most_recent_first_and_track_favorites() {
    let store = memory_store();
    let older = insert(&store, "older", "A", "2024-01-01");
    let newer = insert(&store, "newer", "B", "2024-02-01");
    let history = HistoryService::new(store.clone());

    let mut all = history.all_quotes().unwrap();
    let mut favorites = history.favorite_quotes().unwrap();
    assert_eq!(all.latest(), vec![newer.clone(), older.clone()]);
    assert!(favorites.latest().is_empty());

    let favored = history.toggle_favorite_status(&older).unwrap();
    assert!(favored.is_favorite);
    assert_eq!(favorites.latest(), vec![favored.clone()]);
    assert_eq!(all.latest(), vec![newer, favored]);
}

#[test]
fn favorites_filter_toggles_visible_feed() {
    let store = memory_store();
    let plain = insert(&store, "plain", "A", "2024-01-01");
    let starred = insert(&store, "starred", "B", "2024-01-02");
    store.set_favorite(starred.id, true).unwrap();
    let history = HistoryService::new(store.clone());
    let filter = history.subscribe_filter();

    assert!(!history.show_favorites_only());
    assert_eq!(history.visible_quotes().unwrap().snapshot().len(), 2);

    assert!(history.toggle_favorite_filter());
    assert!(*filter.borrow());
    let visible = history.visible_quotes().unwrap().snapshot();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, starred.id);

    assert!(!history.toggle_favorite_filter());
    let visible = history.visible_quotes().unwrap().snapshot();
    assert!(visible.iter().any(|quote| quote.id == plain.id));
}

#[test]
fn delete_and_clear_all_propagate_to_feeds() {
    let store = memory_store();
    let first = insert(&store, "first", "A", "2024-01-01");
    insert(&store, "second", "B", "2024-01-02");
    let history = HistoryService::new(store.clone());
    let mut all = history.all_quotes().unwrap();

    history.delete_quote(&first).unwrap();
    assert_eq!(all.latest().len(), 1);

    history.clear_all().unwrap();
    assert!(all.latest().is_empty());
    assert_eq!(store.count().unwrap(), 0);
}
