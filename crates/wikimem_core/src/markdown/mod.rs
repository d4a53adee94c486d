//! Bidirectional markdown conversion with embedded cross-note links.
//!
//! # Responsibility
//! - Convert between markdown text and the document tree the editor edits.
//! - Layer the `[[memory-id]]` inline rule on top of the standard rules.
//!
//! # Invariants
//! - Export renders every link token as `[[target-id]]`, never as the
//!   rendered display title.
//! - Built-in inline rules get first refusal; the memory-link rule is
//!   appended, not prepended.

pub mod doc;
pub mod link;
pub mod transform;
