//! Per-chapter orchestration: fetch, extract, fragment, persist.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;

use crate::fragments::fragment_blocks;
use crate::ingestion::cache::{PageCache, fetch_page};
use crate::ingestion::discover::ChapterLink;
use crate::ingestion::extract::extract_blocks;
use crate::stores::{Backend, ChapterRecord, FragmentRecord};
use crate::types::IngestError;

/// Outcome counters for one chapter run.
#[derive(Debug, Default, Clone)]
pub struct ChapterRunSummary {
    pub chapters_processed: usize,
    pub chapters_skipped: usize,
    pub chapters_failed: usize,
    pub fragments_written: usize,
}

/// Ingests the given chapters into the store.
///
/// Chapters already present in the store (by URL) are skipped. Each chapter
/// is processed independently; a failure is logged and counted, never fatal
/// to the run. A polite delay separates live fetches.
pub async fn ingest_chapters<B: Backend>(
    client: &Client,
    store: &B,
    cache: Option<&PageCache>,
    links: Vec<ChapterLink>,
    fetch_delay: Duration,
) -> Result<ChapterRunSummary, IngestError> {
    let known_urls = store.chapter_urls().await?;
    let mut summary = ChapterRunSummary::default();

    for link in links {
        if known_urls.contains(&link.url) {
            summary.chapters_skipped += 1;
            info!(chapter = %link.title, "already ingested, skipping");
            continue;
        }

        match ingest_one(client, store, cache, &link).await {
            Ok((fragment_count, fetched_live)) => {
                summary.chapters_processed += 1;
                summary.fragments_written += fragment_count;
                info!(chapter = %link.title, fragments = fragment_count, "chapter ingested");
                if fetched_live {
                    sleep(fetch_delay).await;
                }
            }
            Err(err) => {
                summary.chapters_failed += 1;
                warn!(chapter = %link.title, error = %err, "chapter ingest failed");
            }
        }
    }

    Ok(summary)
}

async fn ingest_one<B: Backend>(
    client: &Client,
    store: &B,
    cache: Option<&PageCache>,
    link: &ChapterLink,
) -> Result<(usize, bool), IngestError> {
    let url =
        Url::parse(&link.url).map_err(|err| IngestError::InvalidDocument(err.to_string()))?;
    let page = fetch_page(client, &url, cache).await?;

    let blocks = extract_blocks(&page.html)?;
    let fragments = fragment_blocks(&link.id, blocks);
    let content_length: usize = fragments.iter().map(|f| f.char_count).sum();

    let chapter = ChapterRecord {
        id: link.id.clone(),
        url: link.url.clone(),
        title: link.title.clone(),
        section: link.section.clone(),
        last_scraped: Utc::now().to_rfc3339(),
        content_length,
    };

    let records: Vec<FragmentRecord> = fragments.into_iter().map(FragmentRecord::from).collect();
    let count = records.len();

    store.upsert_chapters(vec![chapter]).await?;
    store.upsert_fragments(records).await?;

    Ok((count, !page.from_cache))
}
