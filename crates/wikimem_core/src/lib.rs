//! Frontend core for the wikimem desktop notes app.
//!
//! The backend process owns persistence, search indexing and the
//! tool-calling surface; this crate is the UI-side orchestration layered on
//! top of it: typed data access, the `[[memory-id]]` markdown link
//! transform, typeahead link suggestion, pane lifecycle with debounced
//! autosave, and the list/search controller.

pub mod backend;
pub mod editor;
pub mod logging;
pub mod markdown;
pub mod model;
pub mod search;
pub mod typeahead;

pub use backend::in_memory::InMemoryBackend;
pub use backend::{
    BackendError, BackendResult, MemoryBackend, RequestSeq, MEMORIES_CHANGED_EVENT,
};
pub use editor::pane::{
    EditorPaneController, PaneCommand, PaneEvent, PaneLifecycle, AUTOSAVE_DEBOUNCE_MS,
};
pub use editor::workspace::{
    PaneConfig, WorkspaceError, WorkspaceOrchestrator, WorkspaceVariant, OVERVIEW_PANE_ID,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use markdown::doc::{Block, Document, Inline, LinkToken};
pub use markdown::link::{MemoryLinkRule, ResolveMemorySummary, LINK_TRIGGER};
pub use markdown::transform::MarkdownTransforms;
pub use model::memory::{
    derive_title_from_markdown, format_timestamp, unix_now_secs, MemoryDetail, MemoryId,
    MemorySearchResult, MemorySummary, DEFAULT_TITLE,
};
pub use model::wire::SaveMemoryPayload;
pub use search::results::{
    ResultsCommand, ResultsController, RECENT_LIST_LIMIT, SEARCH_DEBOUNCE_MS,
};
pub use typeahead::matcher::{apply_selection, find_link_match, TypeaheadMatch};
pub use typeahead::suggest::{
    LinkSelection, LinkSuggestController, SuggestCommand, SUGGESTION_LIST_LIMIT,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
