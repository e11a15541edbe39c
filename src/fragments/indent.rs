//! Classifies a paragraph's raw source as continuation or lead-in.

use scraper::Html;

/// Is this paragraph a continuation of the preceding fragment?
///
/// Inline left-margin or left-padding styling wins outright. Otherwise the
/// markup is stripped and the plain text must carry exactly 4 leading
/// whitespace characters. The source pages indent continuations with a fixed
/// 4-space run; wider matching pulls in block quotes and decorative spacing.
///
/// Stateless; depends only on the single `raw` input.
pub fn is_continuation(raw: &str) -> bool {
    if raw.contains("style=") && (raw.contains("margin-left") || raw.contains("padding-left")) {
        return true;
    }

    let fragment = Html::parse_fragment(raw);
    let text: String = fragment.root_element().text().collect();
    let leading = text.chars().take_while(|c| c.is_whitespace()).count();
    leading == 4
}
