//! Document tree edited by the rich-text surface.

use crate::model::memory::MemorySummary;

/// Inline reference to another memory by id.
///
/// `target_id` is opaque and never validated against existence at parse
/// time; `display_text` is a best-effort resolution that falls back to the
/// id itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkToken {
    pub target_id: String,
    pub display_text: String,
}

impl LinkToken {
    pub fn from_summary(summary: &MemorySummary) -> Self {
        Self {
            target_id: summary.id.clone(),
            display_text: summary.title.clone(),
        }
    }
}

/// Inline node inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
    Emphasis(String),
    Code(String),
    Link { text: String, url: String },
    Memory(LinkToken),
}

/// One line-level block of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    Quote(Vec<Inline>),
    CodeFence { language: String, code: String },
    ListItem { number: Option<u64>, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
}

impl Block {
    fn inlines(&self) -> &[Inline] {
        match self {
            Self::Heading { content, .. }
            | Self::Quote(content)
            | Self::ListItem { content, .. }
            | Self::Paragraph(content) => content,
            Self::CodeFence { .. } => &[],
        }
    }
}

/// Parsed note body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    /// Ids of every memory link in document order, duplicates included.
    pub fn link_targets(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .flat_map(|block| block.inlines())
            .filter_map(|inline| match inline {
                Inline::Memory(token) => Some(token.target_id.as_str()),
                _ => None,
            })
            .collect()
    }
}
