//! Domain model for daily quotes.
//!
//! # Responsibility
//! - Define the canonical quote record shared by store, policy and UI.
//! - Keep normalization (trimming) and validation rules in one place.
//!
//! # Invariants
//! - Every persisted quote is identified by a store-assigned `QuoteId`.
//! - No two persisted quotes share the same text.

pub mod quote;
