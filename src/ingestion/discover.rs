//! Chapter discovery: walks section home pages and collects links to the
//! individual chapter pages beneath them.

use reqwest::Client;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;
use url::Url;

use crate::types::IngestError;

/// Wrapper element holding the section's chapter links.
const MAIN_WRAPPER_SELECTOR: &str = ".edn_mainWrapper";

/// Links must descend into this path to count as chapters.
const CHAPTER_PATH_MARKER: &str = "About-Singapore-Law";

/// Link text at or below this length is navigation noise, not a title.
const MIN_TITLE_CHARS: usize = 5;

/// One discovered chapter page.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChapterLink {
    /// Stable id derived from the chapter URL.
    pub id: String,
    pub url: String,
    pub title: String,
    pub section: String,
}

/// Stable 12-hex-char id for a URL (or any string).
pub fn stable_id(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..12].to_string()
}

/// Extracts chapter links from one section page's HTML.
///
/// Anchors qualify when they descend into the legal-reference path, are not
/// the section page itself, and carry a meaningful title.
pub fn parse_chapter_links(
    html: &str,
    section_url: &str,
    section_name: &str,
) -> Result<Vec<ChapterLink>, IngestError> {
    let document = Html::parse_document(html);
    let wrapper_selector = Selector::parse(MAIN_WRAPPER_SELECTOR)
        .map_err(|err| IngestError::InvalidDocument(err.to_string()))?;
    let anchor_selector =
        Selector::parse("a").map_err(|err| IngestError::InvalidDocument(err.to_string()))?;

    let Some(wrapper) = document.select(&wrapper_selector).next() else {
        return Ok(Vec::new());
    };

    let base = Url::parse(section_url).ok();

    let mut links = Vec::new();
    for anchor in wrapper.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let title: String = anchor
            .text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("");

        // Relative hrefs resolve against the section page when it parses.
        let url = base
            .as_ref()
            .and_then(|b| b.join(href).ok())
            .map(|u| u.to_string())
            .unwrap_or_else(|| href.to_string());

        if href.contains(CHAPTER_PATH_MARKER)
            && url != section_url
            && title.chars().count() > MIN_TITLE_CHARS
        {
            links.push(ChapterLink {
                id: stable_id(&url),
                url,
                title,
                section: section_name.to_string(),
            });
        }
    }

    Ok(links)
}

/// Discovers chapters across all configured section pages.
///
/// A failure on one section is logged and skipped; the remaining sections
/// still contribute their links.
pub async fn discover_chapters(
    client: &Client,
    sections: &[(String, String)],
) -> Vec<ChapterLink> {
    let mut all_links = Vec::new();

    for (section_url, section_name) in sections {
        match fetch_section_links(client, section_url, section_name).await {
            Ok(mut links) => all_links.append(&mut links),
            Err(err) => {
                warn!(section = %section_name, error = %err, "section discovery failed");
            }
        }
    }

    all_links
}

async fn fetch_section_links(
    client: &Client,
    section_url: &str,
    section_name: &str,
) -> Result<Vec<ChapterLink>, IngestError> {
    let response = client.get(section_url).send().await?.error_for_status()?;
    let html = response.text().await?;
    parse_chapter_links(&html, section_url, section_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTION_HTML: &str = r#"
        <html><body>
          <div class="edn_mainWrapper">
            <a href="/About-Singapore-Law/Overview/Ch-01">Ch. 01 The Legal System</a>
            <a href="/About-Singapore-Law/Overview">Overview</a>
            <a href="/About-Singapore-Law/Overview/Ch-02">Ch. 02 Contract Law</a>
            <a href="/Somewhere-Else/page">Ch. 99 Unrelated</a>
            <a href="/About-Singapore-Law/Overview/Ch-03">x</a>
          </div>
          <div class="sidebar"><a href="/About-Singapore-Law/Overview/Ch-04">Ch. 04 Sidebar Link</a></div>
        </body></html>
    "#;

    #[test]
    fn only_qualifying_wrapper_anchors_become_chapters() {
        let links =
            parse_chapter_links(SECTION_HTML, "/About-Singapore-Law/Overview", "Overview").unwrap();

        let titles: Vec<&str> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Ch. 01 The Legal System", "Ch. 02 Contract Law"]
        );
        assert!(links.iter().all(|l| l.section == "Overview"));
    }

    #[test]
    fn ids_are_stable_and_short() {
        let a = stable_id("/About-Singapore-Law/Overview/Ch-01");
        let b = stable_id("/About-Singapore-Law/Overview/Ch-01");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert_ne!(a, stable_id("/About-Singapore-Law/Overview/Ch-02"));
    }

    #[test]
    fn missing_wrapper_yields_no_links() {
        let links = parse_chapter_links("<html><body></body></html>", "/x", "X").unwrap();
        assert!(links.is_empty());
    }
}
