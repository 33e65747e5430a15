//! Free-text note filtering.
//!
//! # Responsibility
//! - Narrow the in-memory collection by a user query.
//! - Keep match semantics in one place for store and callers.

pub mod substring;
