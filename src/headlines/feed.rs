//! RSS feed intake: parsing, date normalization, and skip filtering.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};

use crate::types::IngestError;

/// Default news feed.
pub const HEADLINES_FEED_URL: &str =
    "https://www.singaporelawwatch.sg/Portals/0/RSS/Headlines.xml";

/// Entries older than this many days are not worth summarizing.
pub const MAX_AGE_DAYS: i64 = 60;

/// One feed entry, as published.
#[derive(Clone, Debug)]
pub struct FeedEntry {
    /// Feed-supplied id (guid), when present.
    pub id: Option<String>,
    pub category: String,
    pub title: String,
    pub link: String,
    pub author: String,
    /// Raw publish date string, e.g. `08 May 2025 00:01:00`.
    pub published: String,
}

impl FeedEntry {
    /// The entry's stable id: the feed guid, or a hash of date and title.
    pub fn stable_id(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => {
                let date = self
                    .published_at()
                    .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
                    .unwrap_or_default();
                hash_id(&[&date, &self.title])
            }
        }
    }

    /// Parsed publish date, if the feed's format is recognized.
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        parse_entry_date(&self.published)
    }
}

/// Parses the feed XML into entries.
pub fn parse_feed(xml: &[u8]) -> Result<Vec<FeedEntry>, IngestError> {
    let channel = rss::Channel::read_from(xml).map_err(|err| IngestError::Feed(err.to_string()))?;

    let entries = channel
        .items()
        .iter()
        .map(|item| FeedEntry {
            id: item.guid().map(|guid| guid.value().to_string()),
            category: item
                .categories()
                .first()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            title: item.title().unwrap_or_default().to_string(),
            link: item.link().unwrap_or_default().to_string(),
            author: item.author().unwrap_or_default().to_string(),
            published: item.pub_date().unwrap_or_default().to_string(),
        })
        .collect();

    Ok(entries)
}

/// Parses dates like `08 May 2025 00:01:00`, trying the full month name
/// first and the abbreviated one second.
pub fn parse_entry_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%d %B %Y %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%d %b %Y %H:%M:%S"))
        .ok()
}

/// Hash id over the given elements, joined with `|`.
pub fn hash_id(elements: &[&str]) -> String {
    let joined = elements.join("|");
    let digest = Sha256::digest(joined.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Why an entry was not processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Advertisement,
    DateError,
    TooOld,
    BeforeLastUpdate,
    DuplicateId,
}

/// Applies the skip rules, in order. `None` means the entry should be
/// processed.
pub fn should_skip_entry(
    entry: &FeedEntry,
    now: NaiveDateTime,
    last_updated: Option<NaiveDateTime>,
    existing_ids: &HashSet<String>,
    max_age_days: i64,
) -> Option<SkipReason> {
    if entry.title.starts_with("ADV") {
        return Some(SkipReason::Advertisement);
    }

    let Some(published) = entry.published_at() else {
        return Some(SkipReason::DateError);
    };

    if (now - published).num_days() > max_age_days {
        return Some(SkipReason::TooOld);
    }

    if let Some(last) = last_updated {
        if published <= last {
            return Some(SkipReason::BeforeLastUpdate);
        }
    }

    if !existing_ids.is_empty() && existing_ids.contains(&entry.stable_id()) {
        return Some(SkipReason::DuplicateId);
    }

    None
}
