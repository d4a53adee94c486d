//! Memory summary/detail/search-result records and shared projections.
//!
//! # Responsibility
//! - Provide the snapshot types produced by backend list/load/search calls.
//! - Derive display titles from markdown bodies.
//!
//! # Invariants
//! - Summaries are immutable snapshots; refreshes replace them wholesale.
//! - Title derivation never returns an empty string.

use std::time::{SystemTime, UNIX_EPOCH};

/// Opaque backend-assigned memory identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type MemoryId = String;

/// Title used whenever a memory body derives no usable heading.
pub const DEFAULT_TITLE: &str = "Untitled memory";

/// List/search snapshot of one memory, without its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySummary {
    pub id: MemoryId,
    pub title: String,
    /// Unix epoch seconds of the last persisted change.
    pub updated_at: i64,
}

impl MemorySummary {
    /// Synthesizes a summary for an id nothing else can resolve.
    ///
    /// Used when a `[[id]]` target is unknown: the id doubles as the title
    /// so a dangling link still renders something meaningful.
    pub fn fallback(id: impl Into<MemoryId>, now_secs: i64) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            updated_at: now_secs,
        }
    }
}

/// Fully loaded memory, one in-memory copy per open pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDetail {
    pub id: MemoryId,
    pub title: String,
    pub updated_at: i64,
    /// Markdown body.
    pub body: String,
}

impl MemoryDetail {
    pub fn summary(&self) -> MemorySummary {
        MemorySummary {
            id: self.id.clone(),
            title: self.title.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Ephemeral search hit tied to one search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySearchResult {
    pub id: MemoryId,
    pub title: String,
    pub updated_at: i64,
    pub snippet: String,
}

impl MemorySearchResult {
    pub fn summary(&self) -> MemorySummary {
        MemorySummary {
            id: self.id.clone(),
            title: self.title.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Derives a pane title from a markdown body.
///
/// Takes the first non-blank line; leading `#`s (and following whitespace)
/// are stripped. A heading line that strips to nothing is skipped. An
/// entirely blank body yields [`DEFAULT_TITLE`].
pub fn derive_title_from_markdown(markdown: &str) -> String {
    for line in markdown.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('#') {
            let heading = trimmed.trim_start_matches('#').trim();
            if !heading.is_empty() {
                return heading.to_string();
            }
        } else {
            return trimmed.to_string();
        }
    }
    DEFAULT_TITLE.to_string()
}

/// Formats a unix-seconds timestamp for display.
///
/// Out-of-range values fall back to the raw number instead of failing.
pub fn format_timestamp(seconds: i64) -> String {
    chrono::DateTime::from_timestamp(seconds, 0)
        .map(|moment| moment.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| seconds.to_string())
}

/// Current unix time in whole seconds.
pub fn unix_now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}
