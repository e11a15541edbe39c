//! Detects runs of plain paragraphs that are really unmarked list items and
//! merges them into a single synthetic list block.

use super::blocks::{BlockKind, ContentBlock};

/// Phrases common in legal enumerations. Purely lexical; the predicate does
/// not understand the underlying grammar, so false positives and negatives
/// are accepted as heuristic noise.
const LEGAL_ACTION_PHRASES: [&str; 12] = [
    "veto against",
    "appointment of",
    "concurrence with",
    "withholding of",
    "exercise of",
    "approval of",
    "consent to",
    "power to",
    "authority to",
    "right to",
    "duty to",
    "responsibility for",
];

/// Does this paragraph text read like an unmarked list item?
pub fn looks_like_list_item(text: &str) -> bool {
    let stripped = text.trim();
    let lower = stripped.to_lowercase();
    if !lower.starts_with("the ") || stripped.chars().count() <= 20 {
        return false;
    }
    LEGAL_ACTION_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
}

/// Collapses runs of two or more consecutive list-like paragraphs into one
/// `List` block. The merged text bullets each item on its own line; the
/// merged raw is the space-joined originals. Runs of zero or one are emitted
/// untouched, and non-paragraph blocks pass through and reset the lookahead.
pub fn group_pseudo_lists(blocks: Vec<ContentBlock>) -> Vec<ContentBlock> {
    let mut result = Vec::with_capacity(blocks.len());
    let mut i = 0;

    while i < blocks.len() {
        if blocks[i].kind == BlockKind::Paragraph {
            let mut j = i;
            while j < blocks.len()
                && blocks[j].kind == BlockKind::Paragraph
                && looks_like_list_item(&blocks[j].text)
            {
                j += 1;
            }

            if j - i >= 2 {
                let text = blocks[i..j]
                    .iter()
                    .map(|block| format!("• {}", block.text))
                    .collect::<Vec<_>>()
                    .join("\n");
                let raw = blocks[i..j]
                    .iter()
                    .map(|block| block.raw.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                result.push(ContentBlock::list(text, raw));
                i = j;
            } else {
                result.push(blocks[i].clone());
                i += 1;
            }
        } else {
            result.push(blocks[i].clone());
            i += 1;
        }
    }

    result
}
