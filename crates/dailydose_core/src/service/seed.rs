//! Default quote seeding.
//!
//! # Invariants
//! - Seeding only runs when the store is empty at check time.
//! - Every insert goes through `insert_if_absent`, so a race between the
//!   emptiness check and the inserts cannot duplicate text.

use crate::model::quote::NewQuote;
use crate::repo::quote_store::{QuoteStore, StoreResult};
use log::info;

/// Built-in quotes used when neither the remote source nor the cache can
/// provide anything.
pub const DEFAULT_QUOTES: [(&str, &str); 10] = [
    (
        "The only way to do great work is to love what you do.",
        "Steve Jobs",
    ),
    (
        "Life is what happens to you while you're busy making other plans.",
        "John Lennon",
    ),
    (
        "The future belongs to those who believe in the beauty of their dreams.",
        "Eleanor Roosevelt",
    ),
    (
        "In the end, we will remember not the words of our enemies, but the silence of our friends.",
        "Martin Luther King Jr.",
    ),
    (
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Winston Churchill",
    ),
    (
        "The way to get started is to quit talking and begin doing.",
        "Walt Disney",
    ),
    (
        "Innovation distinguishes between a leader and a follower.",
        "Steve Jobs",
    ),
    (
        "Your time is limited, don't waste it living someone else's life.",
        "Steve Jobs",
    ),
    (
        "It is during our darkest moments that we must focus to see the light.",
        "Aristotle",
    ),
    ("Believe you can and you're halfway there.", "Theodore Roosevelt"),
];

/// Inserts the default quotes stamped with `date_fetched` when the store
/// is empty.
///
/// Returns the number of rows actually inserted (0 when the store already
/// had content).
pub fn seed_defaults<S: QuoteStore + ?Sized>(
    store: &S,
    date_fetched: &str,
) -> StoreResult<usize> {
    if store.count()? > 0 {
        return Ok(0);
    }

    let mut inserted = 0;
    for (text, author) in DEFAULT_QUOTES {
        if store.insert_if_absent(&NewQuote::new(text, author, date_fetched))? {
            inserted += 1;
        }
    }

    info!("event=quote_seed module=service status=ok inserted={inserted}");
    Ok(inserted)
}
