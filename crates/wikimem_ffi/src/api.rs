//! FFI use-case API for shell-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to the UI shell.
//! - Keep error semantics simple for early-stage integration.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Return values are UTF-8 strings with stable meaning.

use wikimem_core::{
    core_version as core_version_inner, derive_title_from_markdown, find_link_match,
    format_timestamp as format_timestamp_inner, init_logging as init_logging_inner,
    MarkdownTransforms, MemoryLinkRule, MEMORIES_CHANGED_EVENT,
};

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same configuration (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Derives a pane title from a markdown body.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Never returns an empty string.
#[flutter_rust_bridge::frb(sync)]
pub fn derive_title(markdown: String) -> String {
    derive_title_from_markdown(markdown.as_str())
}

/// Formats a unix-seconds timestamp for list display.
///
/// # FFI contract
/// - Sync call, pure computation; out-of-range values fall back to the raw
///   number.
#[flutter_rust_bridge::frb(sync)]
pub fn format_timestamp(seconds: i64) -> String {
    format_timestamp_inner(seconds)
}

/// Round-trips markdown through the document tree with no link resolution.
///
/// Used by the shell to normalize pasted content; `[[id]]` spans survive in
/// raw-id form.
#[flutter_rust_bridge::frb(sync)]
pub fn normalize_markdown(markdown: String) -> String {
    let transforms = MarkdownTransforms::new(&|_| None);
    transforms.export(&transforms.import(markdown.as_str()))
}

/// Active `[[` trigger match in the text before the caret, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTriggerMatch {
    /// Byte offset where the replaceable span starts.
    pub lead_offset: u64,
    /// Typed fragment after the trigger sequence.
    pub fragment: String,
    /// Full span to replace on selection.
    pub replaceable: String,
}

/// Probes the text before the caret for an active link trigger.
///
/// # FFI contract
/// - Sync call, pure computation; `None` when no trigger is active.
#[flutter_rust_bridge::frb(sync)]
pub fn check_link_trigger(text_before_caret: String) -> Option<LinkTriggerMatch> {
    find_link_match(text_before_caret.as_str()).map(|matched| LinkTriggerMatch {
        lead_offset: matched.lead_offset as u64,
        fragment: matched.matching_string,
        replaceable: matched.replaceable_string,
    })
}

/// A just-completed `[[id]]` at the end of the text before the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedLinkMatch {
    /// Byte offset where the `[[` opens.
    pub offset: u64,
    /// Raw identifier between the brackets.
    pub target_id: String,
}

/// Matches a link pair the user just closed with `]]`.
///
/// The shell calls this when the typed character is `]`; a match means the
/// span should be converted into a link node in place.
#[flutter_rust_bridge::frb(sync)]
pub fn match_completed_link(text_before_caret: String) -> Option<CompletedLinkMatch> {
    MemoryLinkRule::match_at_end(text_before_caret.as_str()).map(|(offset, id)| {
        CompletedLinkMatch {
            offset: offset as u64,
            target_id: id.to_string(),
        }
    })
}

/// Event name the backend emits whenever any memory changes.
///
/// # FFI contract
/// - Sync call, constant value; the shell subscribes under this exact name.
#[flutter_rust_bridge::frb(sync)]
pub fn memories_changed_event() -> String {
    MEMORIES_CHANGED_EVENT.to_string()
}
