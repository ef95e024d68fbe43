//! Anti-repeat quote selection.

use crate::model::quote::Quote;
use rand::seq::SliceRandom;
use rand::Rng;

/// Picks a quote uniformly among those whose trimmed text differs from
/// `current`.
///
/// With no current quote every entry is a candidate. Returns `None` when
/// nothing distinct is left; the current quote is never re-offered.
pub fn pick_different<'a, R: Rng + ?Sized>(
    quotes: &'a [Quote],
    current: Option<&Quote>,
    rng: &mut R,
) -> Option<&'a Quote> {
    let candidates: Vec<&Quote> = match current {
        Some(current) => quotes
            .iter()
            .filter(|quote| !quote.has_same_text(&current.text))
            .collect(),
        None => quotes.iter().collect(),
    };

    candidates.choose(rng).copied()
}
