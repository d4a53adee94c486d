//! The `[[memory-id]]` text-match rule.
//!
//! # Responsibility
//! - Recognize `[[identifier]]` spans and resolve them into link tokens.
//! - Render link tokens back to their raw-id text form.
//!
//! # Invariants
//! - An identifier that trims to empty never produces a link token.
//! - Resolution order is caller-defined: the injected resolver is consulted
//!   first; unresolved ids synthesize a summary from the id itself.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markdown::doc::LinkToken;
use crate::model::memory::{unix_now_secs, MemorySummary};

/// Character that completes the trigger sequence while typing.
pub const LINK_TRIGGER: char = ']';

/// Caller-supplied "resolve memory by id" capability.
///
/// Threaded explicitly through transform construction instead of any global
/// lookup, so each pane can resolve its own id to its live draft title.
pub type ResolveMemorySummary<'a> = &'a dyn Fn(&str) -> Option<MemorySummary>;

static IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\[\]]+?)\]\]").expect("valid memory link regex"));
// Anchored at end-of-input so a match fires as the user finishes typing `]]`.
static TRIGGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\[\]]+?)\]\]$").expect("valid memory link trigger regex"));

/// Inline rule converting `[[id]]` spans to [`LinkToken`]s and back.
pub struct MemoryLinkRule<'a> {
    resolver: ResolveMemorySummary<'a>,
}

impl<'a> MemoryLinkRule<'a> {
    pub fn new(resolver: ResolveMemorySummary<'a>) -> Self {
        Self { resolver }
    }

    /// First `[[id]]` span in `text`: byte range of the whole span plus the
    /// raw identifier between the brackets.
    pub fn find(text: &str) -> Option<(std::ops::Range<usize>, &str)> {
        let caps = IMPORT_RE.captures(text)?;
        let whole = caps.get(0)?;
        let inner = caps.get(1)?;
        Some((whole.range(), inner.as_str()))
    }

    /// Matches a just-completed `[[id]]` at the end of `text`.
    ///
    /// Returns the byte offset where the span starts and the identifier.
    pub fn match_at_end(text: &str) -> Option<(usize, &str)> {
        let caps = TRIGGER_RE.captures(text)?;
        let whole = caps.get(0)?;
        let inner = caps.get(1)?;
        Some((whole.start(), inner.as_str()))
    }

    /// Resolves a raw identifier into a link token.
    ///
    /// Returns `None` for identifiers that trim to empty, leaving the text
    /// as-is.
    pub fn resolve_token(&self, raw_id: &str) -> Option<LinkToken> {
        let id = raw_id.trim();
        if id.is_empty() {
            return None;
        }
        let summary = (self.resolver)(id)
            .unwrap_or_else(|| MemorySummary::fallback(id, unix_now_secs()));
        Some(LinkToken::from_summary(&summary))
    }

    /// Text form of a link token. Always the raw target id.
    pub fn export(token: &LinkToken) -> String {
        format!("[[{}]]", token.target_id)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryLinkRule;
    use crate::model::memory::MemorySummary;

    #[test]
    fn match_at_end_requires_closing_brackets_at_input_end() {
        assert_eq!(
            MemoryLinkRule::match_at_end("see [[note-42]]"),
            Some((4, "note-42"))
        );
        assert_eq!(MemoryLinkRule::match_at_end("see [[note-42]] now"), None);
        assert_eq!(MemoryLinkRule::match_at_end("see [[note-42"), None);
    }

    #[test]
    fn resolve_token_prefers_resolver_and_falls_back_to_id() {
        let resolver = |id: &str| {
            (id == "m-1").then(|| MemorySummary {
                id: "m-1".to_string(),
                title: "Planning".to_string(),
                updated_at: 7,
            })
        };
        let rule = MemoryLinkRule::new(&resolver);

        let resolved = rule.resolve_token("m-1").expect("known id resolves");
        assert_eq!(resolved.display_text, "Planning");

        let dangling = rule.resolve_token("m-9").expect("unknown id still links");
        assert_eq!(dangling.display_text, "m-9");

        assert!(rule.resolve_token("   ").is_none());
    }
}
