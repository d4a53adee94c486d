//! Editor surfaces: single-pane note lifecycle and the multi-pane workspace.
//!
//! # Responsibility
//! - Own one note's draft per pane (`pane`), never shared across panes.
//! - Own the ordered collection of open panes (`workspace`).
//!
//! # Invariants
//! - Exactly one pane ever represents a given memory id at a time.
//! - Only the last-persisted copy of a note is visible outside its pane.

pub mod pane;
pub mod workspace;
