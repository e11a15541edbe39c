//! Typed content blocks, the unit of extracted document content.

use serde::{Deserialize, Serialize};

/// Kind of an extracted content block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Paragraph,
    Table,
    List,
}

/// One unit of extracted document content.
///
/// `text` is the normalized display text. `raw` preserves the original source
/// representation (outer HTML for paragraphs), which the indentation
/// classifier inspects for leading whitespace and inline styling. Blocks are
/// immutable once produced; later stages only read them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentBlock {
    pub text: String,
    pub kind: BlockKind,
    pub raw: String,
}

impl ContentBlock {
    pub fn heading(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            raw: text.clone(),
            text,
            kind: BlockKind::Heading,
        }
    }

    pub fn paragraph(text: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: BlockKind::Paragraph,
            raw: raw.into(),
        }
    }

    pub fn table(text: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: BlockKind::Table,
            raw: raw.into(),
        }
    }

    pub fn list(text: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: BlockKind::List,
            raw: raw.into(),
        }
    }
}
