//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the quote store contract consumed by the policy services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Writes validate quotes before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateText`)
//!   in addition to DB transport errors.

pub mod quote_store;
