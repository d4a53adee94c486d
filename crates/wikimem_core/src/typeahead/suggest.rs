//! Suggestion list controller behind the `[[` trigger.
//!
//! # Responsibility
//! - Turn trigger fragments into backend search calls, deduplicated by a
//!   controller-lifetime query cache.
//! - Apply a selection back into the text as a memory link.
//!
//! # Invariants
//! - A query whose in-flight sentinel is outstanding issues no second call.
//! - Failed searches cache an empty result set; stale responses only ever
//!   populate the cache, never the visible list.

use std::collections::HashMap;

use log::debug;

use crate::backend::{BackendResult, RequestSeq};
use crate::model::memory::{MemorySearchResult, MemorySummary};
use crate::typeahead::matcher::{apply_selection, TypeaheadMatch};

/// At most this many suggestions are shown in the popup.
pub const SUGGESTION_LIST_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CacheSlot {
    /// Sentinel: a search for this query is outstanding.
    InFlight,
    Ready(Vec<MemorySearchResult>),
}

/// Search call the host should issue against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestCommand {
    pub seq: RequestSeq,
    pub query: String,
}

/// Outcome of picking a suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSelection {
    /// Text with the matched span replaced by `[[id]]`.
    pub text: String,
    /// Byte offset for the caret, immediately after the inserted link.
    pub caret: usize,
    /// The chosen memory, reported upward as a followed/inserted link.
    pub memory: MemorySummary,
}

/// State machine over the suggestion list for one editor pane.
#[derive(Debug, Default)]
pub struct LinkSuggestController {
    cache: HashMap<String, CacheSlot>,
    in_flight: HashMap<RequestSeq, String>,
    current_query: Option<String>,
    results: Vec<MemorySearchResult>,
    next_seq: RequestSeq,
}

impl LinkSuggestController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the latest trigger fragment (or `None` when the trigger ended).
    ///
    /// Returns the search the host must run, if this query is not already
    /// cached or in flight.
    pub fn query_changed(&mut self, fragment: Option<&str>) -> Option<SuggestCommand> {
        let trimmed = fragment.map(str::trim).unwrap_or("");
        if trimmed.is_empty() {
            self.current_query = None;
            self.results.clear();
            return None;
        }

        self.current_query = Some(trimmed.to_string());
        match self.cache.get(trimmed) {
            Some(CacheSlot::InFlight) => {
                // Ignored until the outstanding call resolves.
                self.results.clear();
                None
            }
            Some(CacheSlot::Ready(cached)) => {
                self.results = cached.clone();
                None
            }
            None => {
                self.cache.insert(trimmed.to_string(), CacheSlot::InFlight);
                self.results.clear();
                self.next_seq += 1;
                let seq = self.next_seq;
                self.in_flight.insert(seq, trimmed.to_string());
                Some(SuggestCommand {
                    seq,
                    query: trimmed.to_string(),
                })
            }
        }
    }

    /// Applies a finished backend search.
    pub fn handle_search_result(
        &mut self,
        seq: RequestSeq,
        result: BackendResult<Vec<MemorySearchResult>>,
    ) {
        let Some(query) = self.in_flight.remove(&seq) else {
            debug!("event=suggest_stale_drop module=typeahead seq={seq}");
            return;
        };
        let results = match result {
            Ok(results) => results,
            // Failure degrades to "no suggestions" for this query.
            Err(err) => {
                debug!(
                    "event=suggest_search_fail module=typeahead query_len={} error={err}",
                    query.len()
                );
                Vec::new()
            }
        };
        self.cache
            .insert(query.clone(), CacheSlot::Ready(results.clone()));
        if self.current_query.as_deref() == Some(query.as_str()) {
            self.results = results;
        }
    }

    /// Suggestions to render: backend order, capped at the display limit.
    pub fn options(&self) -> &[MemorySearchResult] {
        let shown = self.results.len().min(SUGGESTION_LIST_LIMIT);
        &self.results[..shown]
    }

    /// Replaces the matched span in `text` with the suggestion at `index`.
    pub fn select(
        &self,
        index: usize,
        text: &str,
        matched: &TypeaheadMatch,
    ) -> Option<LinkSelection> {
        let memory = self.options().get(index)?.summary();
        let (text, caret) = apply_selection(text, matched, &memory);
        Some(LinkSelection {
            text,
            caret,
            memory,
        })
    }

    /// Drops all cached queries and visible state (workspace reset).
    pub fn reset(&mut self) {
        self.cache.clear();
        self.in_flight.clear();
        self.current_query = None;
        self.results.clear();
    }

    pub fn current_query(&self) -> Option<&str> {
        self.current_query.as_deref()
    }
}
