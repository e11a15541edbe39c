//! Footer detection: finds where trailing navigation, attribution, and other
//! page chrome begins and truncates the block sequence there.

use super::blocks::{BlockKind, ContentBlock};

/// Substrings that mark footer content wherever they appear.
const FOOTER_MARKERS: [&str; 6] = [
    "updated as at",
    "by:",
    "disclaimer:",
    "@singaporelawwatch.sg",
    "email protected",
    "the writers wish to acknowledge",
];

/// Positional heuristics only fire past this index, so early body content
/// containing chapter references is never mistaken for navigation.
const POSITIONAL_GUARD: usize = 10;

/// Returns the prefix of `blocks` strictly before the first footer block.
///
/// A block is footer content if its lowercased text contains one of
/// [`FOOTER_MARKERS`], or if positional heuristics fire late in the page:
/// doubled chapter-navigation tokens in a short block, print/tags chrome,
/// long all-digit strings, or a references section. The first block is
/// exempt when it is a heading carrying the chapter title.
pub fn truncate_footer(blocks: Vec<ContentBlock>) -> Vec<ContentBlock> {
    let mut kept = Vec::with_capacity(blocks.len());

    for (i, block) in blocks.into_iter().enumerate() {
        if is_footer_block(i, &block) {
            break;
        }
        kept.push(block);
    }

    kept
}

fn is_footer_block(index: usize, block: &ContentBlock) -> bool {
    let lower = block.text.trim().to_lowercase();

    if FOOTER_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return true;
    }

    if index == 0 && block.kind == BlockKind::Heading && lower.starts_with("ch. ") {
        // Legitimate chapter title.
        return false;
    }

    if index > POSITIONAL_GUARD {
        if lower.contains("ch. ") && lower.chars().count() < 100 {
            // Navigation like "Ch. 01 The Legal SystemCh. 03 Mediation".
            return lower.matches("ch. ").count() >= 2;
        }
        if lower == "print" || lower.starts_with("tags:") {
            return true;
        }
        if !lower.is_empty()
            && lower.chars().all(|c| c.is_ascii_digit())
            && lower.chars().count() > 3
        {
            return true;
        }
        if lower.starts_with("references") {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> ContentBlock {
        ContentBlock::paragraph(text, text)
    }

    fn body(n: usize) -> Vec<ContentBlock> {
        (0..n)
            .map(|i| para(&format!("1.1.{} Body paragraph number {i}.", i + 1)))
            .collect()
    }

    #[test]
    fn marker_truncates_anywhere() {
        let mut blocks = body(3);
        blocks.push(para("Updated as at 30 June 2024"));
        blocks.push(para("1.1.9 Should be gone."));

        let kept = truncate_footer(blocks);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn chapter_title_heading_at_index_zero_survives() {
        let mut blocks = vec![ContentBlock::heading("Ch. 02 Contract Law")];
        blocks.extend(body(2));

        let kept = truncate_footer(blocks);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn doubled_navigation_tokens_truncate_late_in_page() {
        let mut blocks = body(12);
        blocks.push(para("Ch. 01 The Singapore Legal SystemCh. 03 Mediation"));
        blocks.push(para("1.9.1 Trailing paragraph."));
        blocks.push(para("1.9.2 Another trailing paragraph."));

        let kept = truncate_footer(blocks);
        assert_eq!(kept.len(), 12);
    }

    #[test]
    fn single_chapter_reference_early_in_body_survives() {
        let mut blocks = body(2);
        blocks.push(para("See Ch. 05 for the law of agency."));
        blocks.push(para("1.2.1 Continues normally."));

        let kept = truncate_footer(blocks);
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn print_tags_digits_and_references_truncate_late() {
        for trailing in ["print", "Tags: contract, tort", "48215", "References"] {
            let mut blocks = body(11);
            blocks.push(para(trailing));
            blocks.push(para("1.8.1 Should be dropped."));

            let kept = truncate_footer(blocks);
            assert_eq!(kept.len(), 11, "failed for {trailing:?}");
        }
    }

    #[test]
    fn short_numeric_strings_are_kept() {
        let mut blocks = body(11);
        blocks.push(para("123"));

        let kept = truncate_footer(blocks);
        assert_eq!(kept.len(), 12);
    }

    #[test]
    fn no_footer_passes_everything_through() {
        let kept = truncate_footer(body(15));
        assert_eq!(kept.len(), 15);
    }
}
