//! List/search pane state: recent notes plus debounced search.
//!
//! # Responsibility
//! - Debounce the search box and suppress out-of-order results.
//! - Merge search results with the recent-notes listing.

pub mod results;
