//! Typeahead link suggestion: trigger matching and the suggestion list.
//!
//! # Responsibility
//! - Detect the `[[` trigger sequence while the user types.
//! - Query the backend for candidate memories, debounced by the query cache.
//!
//! # Invariants
//! - At most one backend call is ever outstanding per trimmed query string.
//! - The rendered list is capped at five entries in backend order.

pub mod matcher;
pub mod suggest;
