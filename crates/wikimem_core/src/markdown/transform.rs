//! Markdown import/export pipeline.
//!
//! # Responsibility
//! - Convert markdown text into [`Document`] trees and back.
//! - Run the standard block/inline rules first and the memory-link rule
//!   last, so built-in syntax gets first refusal.
//!
//! # Invariants
//! - Line-level blocks round-trip position-stable: a `[[id]]` span re-exports
//!   at the same place it was imported from.
//! - Export always emits raw target ids for link tokens.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markdown::doc::{Block, Document, Inline};
use crate::markdown::link::{MemoryLinkRule, ResolveMemorySummary};

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6}) (.*)$").expect("valid heading regex"));
static ORDERED_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\. (.*)$").expect("valid ordered item regex"));
static CODE_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid code span regex"));
static STRONG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid strong regex"));
static EMPHASIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*]+)\*").expect("valid emphasis regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]+)\]\(([^()]+)\)").expect("valid link regex"));

type InlineMatch = (usize, usize, Inline);

/// Transform pipeline bound to one pane's resolver.
pub struct MarkdownTransforms<'a> {
    link_rule: MemoryLinkRule<'a>,
}

impl<'a> MarkdownTransforms<'a> {
    /// Builds the standard transform set with the memory-link rule appended.
    pub fn new(resolver: ResolveMemorySummary<'a>) -> Self {
        Self {
            link_rule: MemoryLinkRule::new(resolver),
        }
    }

    /// Markdown text to document tree.
    pub fn import(&self, markdown: &str) -> Document {
        let mut blocks = Vec::new();
        let mut fence: Option<(String, Vec<&str>)> = None;

        for line in markdown.lines() {
            if let Some((language, code_lines)) = fence.as_mut() {
                if line.trim() == "```" {
                    blocks.push(Block::CodeFence {
                        language: language.clone(),
                        code: code_lines.join("\n"),
                    });
                    fence = None;
                } else {
                    code_lines.push(line);
                }
                continue;
            }
            if let Some(rest) = line.strip_prefix("```") {
                fence = Some((rest.trim().to_string(), Vec::new()));
                continue;
            }
            blocks.push(self.parse_line(line));
        }

        // Unterminated fence: keep the collected lines as code anyway.
        if let Some((language, code_lines)) = fence {
            blocks.push(Block::CodeFence {
                language,
                code: code_lines.join("\n"),
            });
        }

        Document { blocks }
    }

    /// Document tree to markdown text.
    pub fn export(&self, document: &Document) -> String {
        document
            .blocks
            .iter()
            .map(export_block)
            .collect::<Vec<String>>()
            .join("\n")
    }

    fn parse_line(&self, line: &str) -> Block {
        if let Some(caps) = HEADING_RE.captures(line) {
            return Block::Heading {
                level: caps[1].len() as u8,
                content: self.parse_inlines(&caps[2]),
            };
        }
        if let Some(rest) = line.strip_prefix("> ") {
            return Block::Quote(self.parse_inlines(rest));
        }
        if let Some(rest) = line.strip_prefix("- ") {
            return Block::ListItem {
                number: None,
                content: self.parse_inlines(rest),
            };
        }
        if let Some(caps) = ORDERED_ITEM_RE.captures(line) {
            if let Ok(number) = caps[1].parse::<u64>() {
                return Block::ListItem {
                    number: Some(number),
                    content: self.parse_inlines(&caps[2]),
                };
            }
        }
        Block::Paragraph(self.parse_inlines(line))
    }

    fn parse_inlines(&self, text: &str) -> Vec<Inline> {
        let mut nodes = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            match self.next_inline(rest) {
                Some((start, end, node)) => {
                    if start > 0 {
                        nodes.push(Inline::Text(rest[..start].to_string()));
                    }
                    nodes.push(node);
                    rest = &rest[end..];
                }
                None => {
                    nodes.push(Inline::Text(rest.to_string()));
                    break;
                }
            }
        }
        nodes
    }

    /// Earliest match wins; on equal offsets the earlier rule in the list
    /// wins, which is what keeps the memory-link rule behind the built-ins.
    fn next_inline(&self, text: &str) -> Option<InlineMatch> {
        let mut best: Option<InlineMatch> = None;
        for candidate in [
            capture_span(&CODE_SPAN_RE, text, Inline::Code),
            capture_span(&STRONG_RE, text, Inline::Strong),
            capture_span(&EMPHASIS_RE, text, Inline::Emphasis),
            find_link(text),
            self.find_memory_link(text),
        ]
        .into_iter()
        .flatten()
        {
            best = match best {
                Some(current) if current.0 <= candidate.0 => Some(current),
                _ => Some(candidate),
            };
        }
        best
    }

    fn find_memory_link(&self, text: &str) -> Option<InlineMatch> {
        let (range, raw_id) = MemoryLinkRule::find(text)?;
        let node = match self.link_rule.resolve_token(raw_id) {
            Some(token) => Inline::Memory(token),
            // Identifier trims to empty: keep the literal text.
            None => Inline::Text(text[range.clone()].to_string()),
        };
        Some((range.start, range.end, node))
    }
}

fn capture_span(
    pattern: &Regex,
    text: &str,
    build: impl FnOnce(String) -> Inline,
) -> Option<InlineMatch> {
    let caps = pattern.captures(text)?;
    let whole = caps.get(0)?;
    let inner = caps.get(1)?;
    Some((whole.start(), whole.end(), build(inner.as_str().to_string())))
}

fn find_link(text: &str) -> Option<InlineMatch> {
    let caps = LINK_RE.captures(text)?;
    let whole = caps.get(0)?;
    Some((
        whole.start(),
        whole.end(),
        Inline::Link {
            text: caps.get(1)?.as_str().to_string(),
            url: caps.get(2)?.as_str().to_string(),
        },
    ))
}

fn export_block(block: &Block) -> String {
    match block {
        Block::Heading { level, content } => {
            format!(
                "{} {}",
                "#".repeat(usize::from(*level)),
                export_inlines(content)
            )
        }
        Block::Quote(content) => format!("> {}", export_inlines(content)),
        Block::CodeFence { language, code } => {
            let mut out = format!("```{language}\n");
            if !code.is_empty() {
                out.push_str(code);
                out.push('\n');
            }
            out.push_str("```");
            out
        }
        Block::ListItem {
            number: Some(number),
            content,
        } => format!("{number}. {}", export_inlines(content)),
        Block::ListItem {
            number: None,
            content,
        } => format!("- {}", export_inlines(content)),
        Block::Paragraph(content) => export_inlines(content),
    }
}

fn export_inlines(nodes: &[Inline]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Inline::Text(text) => out.push_str(text),
            Inline::Strong(text) => {
                out.push_str("**");
                out.push_str(text);
                out.push_str("**");
            }
            Inline::Emphasis(text) => {
                out.push('*');
                out.push_str(text);
                out.push('*');
            }
            Inline::Code(text) => {
                out.push('`');
                out.push_str(text);
                out.push('`');
            }
            Inline::Link { text, url } => {
                out.push_str(&format!("[{text}]({url})"));
            }
            Inline::Memory(token) => out.push_str(&MemoryLinkRule::export(token)),
        }
    }
    out
}
