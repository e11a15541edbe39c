//! News-side pipeline: feed intake, article content, summaries.
//!
//! ```text
//! RSS feed ──► feed::parse_feed ──► skip filtering
//!                                        │
//!                                        ▼
//!                      reader::fetch_article_text (proxy, retry)
//!                                        │
//!                                        ▼
//!                        Summarizer (LLM or fallback)
//!                                        │
//!                                        ▼
//!                             HeadlineRecord batch
//! ```
//!
//! Every per-entry step degrades gracefully: unreadable articles fall back
//! to title-derived text, failed summaries to a title-derived summary.

pub mod feed;
pub mod reader;
pub mod summarize;

pub use feed::{FeedEntry, HEADLINES_FEED_URL, MAX_AGE_DAYS, SkipReason, parse_feed};
pub use reader::{fetch_article_text, is_problematic_url};
pub use summarize::{RigSummarizer, SUMMARY_SYSTEM_PROMPT, Summarizer, fallback_summary};

use std::collections::HashSet;

use chrono::Utc;
use futures_util::future::join_all;
use reqwest::Client;
use tracing::{info, warn};

use crate::stores::{Backend, HeadlineRecord};
use crate::types::IngestError;

use feed::{parse_entry_date, should_skip_entry};
use reader::fallback_text;

/// Outcome counters for one headline run.
#[derive(Debug, Default, Clone)]
pub struct HeadlineRunSummary {
    pub processed: usize,
    pub skipped_ads: usize,
    pub skipped_date_errors: usize,
    pub skipped_old: usize,
    pub skipped_by_time: usize,
    pub skipped_by_id: usize,
}

/// Processes one feed entry into a record, with graceful fallbacks.
pub async fn process_entry(
    client: &Client,
    reader_token: Option<&str>,
    summarizer: &dyn Summarizer,
    entry: FeedEntry,
) -> HeadlineRecord {
    let published = entry
        .published_at()
        .unwrap_or_else(|| Utc::now().naive_utc());
    let date = published.format("%Y-%m-%dT%H:%M:%S").to_string();

    info!(title = %entry.title, date = %date, "processing headline");

    let text = if is_problematic_url(&entry.link) {
        info!(link = %entry.link, "skipping reader proxy for problematic URL pattern");
        fallback_text(&entry.title, &entry.link)
    } else {
        match fetch_article_text(client, reader_token, &entry.link).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => fallback_text(&entry.title, &entry.link),
            Err(err) => {
                warn!(title = %entry.title, error = %err, "article fetch failed, using fallback");
                fallback_text(&entry.title, &entry.link)
            }
        }
    };

    let summary = match summarizer.summarize(&text).await {
        Ok(summary) => summary,
        Err(err) => {
            warn!(title = %entry.title, error = %err, "summary failed, using fallback");
            fallback_summary(&entry.title)
        }
    };

    HeadlineRecord {
        id: entry.stable_id(),
        category: entry.category,
        title: entry.title,
        source_link: entry.link,
        author: entry.author,
        date,
        imported_on: Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string(),
        text,
        summary,
    }
}

/// Pulls the feed, filters entries against the store, processes the rest
/// concurrently, and persists the results.
pub async fn ingest_headlines<B: Backend>(
    client: &Client,
    store: &B,
    summarizer: &dyn Summarizer,
    reader_token: Option<&str>,
    feed_url: &str,
    max_age_days: i64,
) -> Result<HeadlineRunSummary, IngestError> {
    info!(feed = %feed_url, "fetching headlines");
    let response = client.get(feed_url).send().await?.error_for_status()?;
    let body = response.bytes().await?;
    let entries = parse_feed(&body)?;

    let existing_ids: HashSet<String> = store.headline_ids().await?;
    let last_updated = store
        .latest_headline_date()
        .await?
        .as_deref()
        .and_then(parse_iso_date);

    let now = Utc::now().naive_utc();
    let mut summary = HeadlineRunSummary::default();
    let mut to_process = Vec::new();

    for entry in entries {
        match should_skip_entry(&entry, now, last_updated, &existing_ids, max_age_days) {
            None => to_process.push(entry),
            Some(SkipReason::Advertisement) => {
                summary.skipped_ads += 1;
                info!(title = %entry.title, "skipping advertisement");
            }
            Some(SkipReason::DateError) => {
                summary.skipped_date_errors += 1;
                warn!(title = %entry.title, "skipping entry with unparsable date");
            }
            Some(SkipReason::TooOld) => {
                summary.skipped_old += 1;
                info!(title = %entry.title, "skipping old headline");
            }
            Some(SkipReason::BeforeLastUpdate) => {
                summary.skipped_by_time += 1;
                info!(title = %entry.title, "skipping entry before last update");
            }
            Some(SkipReason::DuplicateId) => {
                summary.skipped_by_id += 1;
                info!(title = %entry.title, "skipping duplicate entry");
            }
        }
    }

    summary.processed = to_process.len();

    let records = join_all(
        to_process
            .into_iter()
            .map(|entry| process_entry(client, reader_token, summarizer, entry)),
    )
    .await;

    store.upsert_headlines(records).await?;

    info!(
        added = summary.processed,
        ads = summary.skipped_ads,
        old = summary.skipped_old,
        by_time = summary.skipped_by_time,
        by_id = summary.skipped_by_id,
        "headline run complete"
    );

    Ok(summary)
}

fn parse_iso_date(raw: &str) -> Option<chrono::NaiveDateTime> {
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| parse_entry_date(raw))
}
