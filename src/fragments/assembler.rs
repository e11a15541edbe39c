//! The fragment assembler: a sequential state machine that turns a cleaned
//! block sequence into anchored fragments.
//!
//! Headings are forward-referencing (labels precede content in legal
//! documents) while supplementary material (tables, lists, indented text)
//! is backward-referencing, so the assembler carries both a pending-header
//! buffer and a most-recent-fragment mutation target at the same time.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::blocks::{BlockKind, ContentBlock};
use super::indent::is_continuation;

/// Anchor pattern for numbered paragraphs like `1.1.1` or `2.10.3`.
static SECTION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.\d+\.\d+)").expect("section number pattern is valid"));

/// Text shorter than this (after trimming) is invisible to the assembler.
const MIN_BLOCK_CHARS: usize = 5;

/// Parts of one fragment are joined with a blank line.
const PART_SEPARATOR: &str = "\n\n";

/// One retrievable unit of chapter content, anchored to the numbered
/// paragraph that opened it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fragment {
    /// `{chapter_id}_{section_number}`, e.g. `a1b2c3_1.2.15`.
    pub id: String,
    pub chapter_id: String,
    /// Zero-based position among this chapter's fragments.
    pub order: usize,
    pub content: String,
    /// Unicode scalar count of `content`; recomputed on every append.
    pub char_count: usize,
}

impl Fragment {
    fn append(&mut self, text: &str) {
        self.content.push_str(PART_SEPARATOR);
        self.content.push_str(text);
        self.char_count = self.content.chars().count();
    }
}

/// Assembles fragments from one chapter's cleaned block sequence.
///
/// A fragment opens at every numbered paragraph and absorbs, in order:
/// the headers collected since the previous anchor, the anchor text itself,
/// and any backward-attaching material (tables, lists, continuation
/// paragraphs) that follows. Headers left over at the end of the sequence
/// attach to the last fragment; with no fragment to attach to they are
/// discarded, so a sequence without a single anchor yields no fragments.
pub fn assemble_fragments(chapter_id: &str, blocks: &[ContentBlock]) -> Vec<Fragment> {
    let mut fragments: Vec<Fragment> = Vec::new();
    let mut pending_headers: Vec<String> = Vec::new();
    let mut fragment_index = 0usize;
    let mut last_kind: Option<BlockKind> = None;

    for block in blocks {
        let text = block.text.trim();
        if text.chars().count() < MIN_BLOCK_CHARS {
            // Invisible: does not touch last_kind either.
            continue;
        }

        if block.kind == BlockKind::Paragraph && SECTION_NUMBER.is_match(text) {
            let section = SECTION_NUMBER
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| format!("f{fragment_index:03}"));

            let content = pending_headers
                .drain(..)
                .chain(std::iter::once(text.to_string()))
                .collect::<Vec<_>>()
                .join(PART_SEPARATOR);

            fragments.push(Fragment {
                id: format!("{chapter_id}_{section}"),
                chapter_id: chapter_id.to_string(),
                order: fragment_index,
                char_count: content.chars().count(),
                content,
            });
            fragment_index += 1;
        } else if block.kind == BlockKind::Heading {
            pending_headers.push(text.to_string());
        } else if matches!(block.kind, BlockKind::Table | BlockKind::List) {
            match fragments.last_mut() {
                Some(last) => last.append(text),
                // Nothing to attach to yet; treat as forward-looking context.
                None => pending_headers.push(text.to_string()),
            }
        } else {
            let indented = is_continuation(&block.raw);
            let follows_supplement = matches!(last_kind, Some(BlockKind::Table | BlockKind::List));

            if (indented || follows_supplement) && !fragments.is_empty() {
                // Continuations attach backward; so does explanatory text
                // directly after a table or list.
                if let Some(last) = fragments.last_mut() {
                    last.append(text);
                }
            } else {
                pending_headers.push(text.to_string());
            }
        }

        last_kind = Some(block.kind);
    }

    if !pending_headers.is_empty() {
        if let Some(last) = fragments.last_mut() {
            let trailing = pending_headers.join(PART_SEPARATOR);
            last.append(&trailing);
        }
        // No fragment ever opened: headers are meaningless without an anchor.
    }

    fragments
}
