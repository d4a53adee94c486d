//! Results/search controller for the overview pane.
//!
//! # Responsibility
//! - Keep the raw query and its debounced copy.
//! - Issue backend searches and apply only the response matching the
//!   current debounced query.
//! - Serve the recent-notes listing when search mode is off.
//!
//! # Invariants
//! - Superseded search responses are dropped on arrival, not aborted.
//! - Recent notes are served most-recently-updated first, capped.

use log::debug;

use crate::backend::{BackendResult, RequestSeq};
use crate::model::memory::{MemorySearchResult, MemorySummary};

/// Quiet period before the typed query becomes the active search.
pub const SEARCH_DEBOUNCE_MS: u64 = 250;

/// Cap on the recent-notes listing.
pub const RECENT_LIST_LIMIT: usize = 10;

/// Backend call the host should issue for this controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsCommand {
    FetchRecent { seq: RequestSeq },
    Search { seq: RequestSeq, query: String },
}

/// Controller for the list/search pane.
#[derive(Debug, Default)]
pub struct ResultsController {
    query_text: String,
    debounced_query: String,
    debounce_deadline: Option<u64>,
    next_seq: RequestSeq,
    pending_recent: Option<RequestSeq>,
    /// Marker for the currently active search; only its response applies.
    active_search: Option<(RequestSeq, String)>,
    recent: Vec<MemorySummary>,
    recent_loading: bool,
    recent_error: Option<String>,
    search_results: Vec<MemorySearchResult>,
    search_loading: bool,
    search_error: Option<String>,
}

impl ResultsController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial recent-notes fetch on mount.
    pub fn start(&mut self) -> ResultsCommand {
        self.refresh_recent()
    }

    /// Records a keystroke in the search box and restarts the quiet period.
    pub fn set_query(&mut self, text: &str, now_ms: u64) {
        self.query_text = text.to_string();
        self.debounce_deadline = Some(now_ms + SEARCH_DEBOUNCE_MS);
    }

    /// Fires the debounce timer when its deadline has passed.
    pub fn tick(&mut self, now_ms: u64) -> Option<ResultsCommand> {
        match self.debounce_deadline {
            Some(deadline) if deadline <= now_ms => {
                self.debounce_deadline = None;
                if self.debounced_query == self.query_text {
                    return None;
                }
                self.debounced_query = self.query_text.clone();
                self.run_search()
            }
            _ => None,
        }
    }

    fn run_search(&mut self) -> Option<ResultsCommand> {
        let trimmed = self.debounced_query.trim().to_string();
        if trimmed.is_empty() {
            self.active_search = None;
            self.search_results.clear();
            self.search_error = None;
            self.search_loading = false;
            return None;
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        self.active_search = Some((seq, trimmed.clone()));
        self.search_loading = true;
        Some(ResultsCommand::Search {
            seq,
            query: trimmed,
        })
    }

    /// Applies a finished search; responses for superseded queries are
    /// discarded even when they arrive later.
    pub fn handle_search_result(
        &mut self,
        seq: RequestSeq,
        result: BackendResult<Vec<MemorySearchResult>>,
    ) {
        match &self.active_search {
            Some((active_seq, _)) if *active_seq == seq => {}
            _ => {
                debug!("event=search_stale_drop module=search seq={seq}");
                return;
            }
        }
        self.search_loading = false;
        match result {
            Ok(results) => {
                self.search_results = results;
                self.search_error = None;
            }
            Err(err) => self.search_error = Some(err.message().to_string()),
        }
    }

    /// Issues a recent-notes refresh.
    pub fn refresh_recent(&mut self) -> ResultsCommand {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.pending_recent = Some(seq);
        self.recent_loading = true;
        ResultsCommand::FetchRecent { seq }
    }

    /// Applies a finished list call.
    pub fn handle_recent_result(
        &mut self,
        seq: RequestSeq,
        result: BackendResult<Vec<MemorySummary>>,
    ) {
        if self.pending_recent != Some(seq) {
            debug!("event=recent_stale_drop module=search seq={seq}");
            return;
        }
        self.pending_recent = None;
        self.recent_loading = false;
        match result {
            Ok(summaries) => {
                self.recent = summaries;
                self.recent_error = None;
            }
            Err(err) => self.recent_error = Some(err.message().to_string()),
        }
    }

    /// Reacts to the backend's "notes changed" push: refresh the recent
    /// listing and re-issue the active search, if any.
    pub fn notes_changed(&mut self) -> Vec<ResultsCommand> {
        let mut commands = vec![self.refresh_recent()];
        if let Some((_, query)) = self.active_search.clone() {
            self.next_seq += 1;
            let seq = self.next_seq;
            self.active_search = Some((seq, query.clone()));
            self.search_loading = true;
            commands.push(ResultsCommand::Search { seq, query });
        }
        commands
    }

    pub fn in_search_mode(&self) -> bool {
        !self.debounced_query.trim().is_empty()
    }

    /// Recent notes, most recently updated first, capped for display.
    pub fn recent_memories(&self) -> Vec<MemorySummary> {
        let mut sorted = self.recent.clone();
        sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        sorted.truncate(RECENT_LIST_LIMIT);
        sorted
    }

    pub fn search_results(&self) -> &[MemorySearchResult] {
        &self.search_results
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn debounced_query(&self) -> &str {
        &self.debounced_query
    }

    pub fn search_loading(&self) -> bool {
        self.search_loading
    }

    pub fn recent_loading(&self) -> bool {
        self.recent_loading
    }

    pub fn search_error(&self) -> Option<&str> {
        self.search_error.as_deref()
    }

    pub fn recent_error(&self) -> Option<&str> {
        self.recent_error.as_deref()
    }
}
