//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store and source calls into use-case level APIs.
//! - Keep presentation layers decoupled from storage and transport details.

pub mod daily_quote;
pub mod history;
pub mod seed;
pub mod selection;
pub mod view_state;
