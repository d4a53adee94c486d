//! Domain model for memories (titled markdown documents).
//!
//! # Responsibility
//! - Define the canonical in-memory shapes shared by every controller.
//! - Keep wire-format details isolated in [`wire`].
//!
//! # Invariants
//! - A memory `id` is an opaque, backend-assigned string and is never parsed.
//! - Timestamps are integer seconds since the unix epoch; display formatting
//!   happens locally.

pub mod memory;
pub mod wire;
