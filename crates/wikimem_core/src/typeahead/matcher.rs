//! Trigger-pattern grammar for in-editor link lookup.
//!
//! # Responsibility
//! - Match a partially typed `[[fragment` at the end of the input.
//! - Splice a chosen memory into the text as `[[id]]`.
//!
//! # Invariants
//! - A fragment must be preceded by start-of-text, whitespace, or `(`.
//! - General pattern allows at most one separator between character runs and
//!   75 chars total; the alias fallback allows a plain 50-char run.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::memory::MemorySummary;

/// Punctuation excluded from fragment character runs.
const PUNCTUATION: &str = r##"\.,\+\*\?\$\@\|#\{\}\(\)\^\-\[\]\\/!%'"~=<>_:;"##;

/// Ceiling for the general fragment pattern.
pub const FRAGMENT_LENGTH_LIMIT: usize = 75;
/// Ceiling for the alias-only fallback pattern.
pub const ALIAS_LENGTH_LIMIT: usize = 50;

fn valid_chars() -> String {
    // Anything that is not the trigger bracket, listed punctuation, or
    // whitespace.
    format!(r"[^\[{PUNCTUATION}\s]")
}

static GENERAL_RE: Lazy<Regex> = Lazy::new(|| {
    let run = valid_chars();
    // Each valid char may be followed by one separator: an abbreviation dot
    // ("Mr. "), a single space, or one punctuation character.
    let join = format!(r"(?:\.[ |$]| |[{PUNCTUATION}])?");
    Regex::new(&format!(
        r"(^|\s|\()(\[\[((?:{run}{join}){{0,{FRAGMENT_LENGTH_LIMIT}}}))$"
    ))
    .expect("valid typeahead regex")
});

static ALIAS_RE: Lazy<Regex> = Lazy::new(|| {
    let run = valid_chars();
    Regex::new(&format!(
        r"(^|\s|\()(\[\[((?:{run}){{0,{ALIAS_LENGTH_LIMIT}}}))$"
    ))
    .expect("valid typeahead alias regex")
});

/// One trigger match inside the text before the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeaheadMatch {
    /// Byte offset where the replaceable span starts.
    pub lead_offset: usize,
    /// The typed fragment after `[[`; trimmed before use as a search key.
    pub matching_string: String,
    /// Full span to replace on selection, `[[` included.
    pub replaceable_string: String,
}

/// Checks the text before the caret for an active `[[` trigger.
pub fn find_link_match(text: &str) -> Option<TypeaheadMatch> {
    check_for_link_match(text, 0)
}

fn check_for_link_match(text: &str, min_match_length: usize) -> Option<TypeaheadMatch> {
    let caps = GENERAL_RE
        .captures(text)
        .or_else(|| ALIAS_RE.captures(text))?;
    let replaceable = caps.get(2)?;
    let fragment = caps.get(3)?;
    if fragment.as_str().len() < min_match_length {
        return None;
    }
    Some(TypeaheadMatch {
        lead_offset: replaceable.start(),
        matching_string: fragment.as_str().to_string(),
        replaceable_string: replaceable.as_str().to_string(),
    })
}

/// Replaces the matched span with a link to `memory`.
///
/// Returns the new text and the byte offset for the caret, placed
/// immediately after the inserted `[[id]]`.
pub fn apply_selection(
    text: &str,
    matched: &TypeaheadMatch,
    memory: &MemorySummary,
) -> (String, usize) {
    let span_end = matched.lead_offset + matched.replaceable_string.len();
    let mut out = String::with_capacity(text.len() + memory.id.len() + 4);
    out.push_str(&text[..matched.lead_offset]);
    out.push_str("[[");
    out.push_str(&memory.id);
    out.push_str("]]");
    let caret = out.len();
    out.push_str(&text[span_end..]);
    (out, caret)
}
