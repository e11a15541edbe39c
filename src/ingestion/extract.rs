//! Turns a chapter page into the ordered block sequence the fragmentation
//! engine consumes.

use scraper::{ElementRef, Html, Selector};

use crate::fragments::ContentBlock;
use crate::types::IngestError;

/// Article container on chapter pages.
const ARTICLE_SELECTOR: &str = ".edn_article";

/// Extracts content blocks from chapter HTML, in document reading order.
///
/// Walks paragraphs, tables, lists, divs, and headings inside the article
/// container. Elements nested inside a table or list are skipped, since
/// their text is already captured at the container; tables render as
/// `cell | cell` rows, lists as one prefixed item per line. Paragraphs and
/// divs keep their outer HTML as `raw` so indentation detection stays
/// possible downstream.
pub fn extract_blocks(html: &str) -> Result<Vec<ContentBlock>, IngestError> {
    let document = Html::parse_document(html);
    let article_selector = Selector::parse(ARTICLE_SELECTOR)
        .map_err(|err| IngestError::InvalidDocument(err.to_string()))?;
    let content_selector = Selector::parse("p, table, ul, ol, div, h1, h2, h3, h4, h5, h6")
        .map_err(|err| IngestError::InvalidDocument(err.to_string()))?;

    let article = document
        .select(&article_selector)
        .next()
        .ok_or_else(|| IngestError::InvalidDocument("article container not found".to_string()))?;

    let mut blocks = Vec::new();
    for element in article.select(&content_selector) {
        if nested_in_captured_container(element) {
            continue;
        }

        match element.value().name() {
            "table" => {
                let text = table_text(element)?;
                if !text.trim().is_empty() {
                    blocks.push(ContentBlock::table(text, collapsed_text(element)));
                }
            }
            "ul" | "ol" => {
                let text = list_text(element);
                if !text.trim().is_empty() {
                    blocks.push(ContentBlock::list(text, collapsed_text(element)));
                }
            }
            "p" | "div" => {
                let text = collapsed_text(element);
                if !text.is_empty() {
                    blocks.push(ContentBlock::paragraph(text, element.html()));
                }
            }
            _ => {
                let text = collapsed_text(element);
                if !text.is_empty() {
                    blocks.push(ContentBlock::heading(text));
                }
            }
        }
    }

    Ok(blocks)
}

/// True when the element sits inside a table or list whose content is
/// captured wholesale at the container.
fn nested_in_captured_container(element: ElementRef) -> bool {
    element.ancestors().any(|node| {
        ElementRef::wrap(node)
            .map(|el| matches!(el.value().name(), "table" | "ul" | "ol"))
            .unwrap_or(false)
    })
}

/// All descendant text, each segment stripped, concatenated.
fn collapsed_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("")
}

/// Renders a table as `cell | cell` rows, one row per line.
fn table_text(table: ElementRef) -> Result<String, IngestError> {
    let row_selector =
        Selector::parse("tr").map_err(|err| IngestError::InvalidDocument(err.to_string()))?;
    let cell_selector =
        Selector::parse("td, th").map_err(|err| IngestError::InvalidDocument(err.to_string()))?;

    let mut rows = Vec::new();
    for tr in table.select(&row_selector) {
        let cells: Vec<String> = tr.select(&cell_selector).map(collapsed_text).collect();
        if !cells.is_empty() {
            rows.push(cells.join(" | "));
        }
    }
    Ok(rows.join("\n"))
}

/// Renders a list one item per line; unordered items get `- `, ordered `• `.
fn list_text(list: ElementRef) -> String {
    let prefix = if list.value().name() == "ul" {
        "- "
    } else {
        "• "
    };

    let mut items = Vec::new();
    for child in list.children() {
        let Some(li) = ElementRef::wrap(child) else {
            continue;
        };
        if li.value().name() != "li" {
            continue;
        }
        let text = collapsed_text(li);
        if !text.is_empty() {
            items.push(format!("{prefix}{text}"));
        }
    }
    items.join("\n")
}
