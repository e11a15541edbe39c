//! Storage backends for chapters, fragments, and headlines.
//!
//! The [`Backend`] trait keeps pipeline code database-agnostic; upsert and
//! dedup by id are the store's responsibility, not the fragmentation core's.

pub mod sqlite;

pub use sqlite::SqliteStore;

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::fragments::Fragment;
use crate::types::IngestError;

/// One legal chapter page.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub id: String,
    pub url: String,
    pub title: String,
    pub section: String,
    /// ISO timestamp of the last successful scrape.
    pub last_scraped: String,
    /// Total characters across the chapter's fragments.
    pub content_length: usize,
}

/// One persisted content fragment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FragmentRecord {
    pub id: String,
    pub chapter_id: String,
    pub fragment_order: usize,
    pub content: String,
    pub char_count: usize,
}

impl From<Fragment> for FragmentRecord {
    fn from(fragment: Fragment) -> Self {
        FragmentRecord {
            id: fragment.id,
            chapter_id: fragment.chapter_id,
            fragment_order: fragment.order,
            content: fragment.content,
            char_count: fragment.char_count,
        }
    }
}

/// One summarized news headline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeadlineRecord {
    pub id: String,
    pub category: String,
    pub title: String,
    pub source_link: String,
    pub author: String,
    pub date: String,
    pub imported_on: String,
    pub text: String,
    pub summary: String,
}

/// Unified interface for persistence backends.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn upsert_chapters(&self, chapters: Vec<ChapterRecord>) -> Result<(), IngestError>;

    async fn upsert_fragments(&self, fragments: Vec<FragmentRecord>) -> Result<(), IngestError>;

    async fn upsert_headlines(&self, headlines: Vec<HeadlineRecord>) -> Result<(), IngestError>;

    /// URLs of chapters already ingested, for incremental runs.
    async fn chapter_urls(&self) -> Result<HashSet<String>, IngestError>;

    /// A chapter's fragments, in fragment order.
    async fn fragments_for_chapter(
        &self,
        chapter_id: &str,
    ) -> Result<Vec<FragmentRecord>, IngestError>;

    /// Ids of headlines already stored.
    async fn headline_ids(&self) -> Result<HashSet<String>, IngestError>;

    /// Publish date of the newest stored headline, if any.
    async fn latest_headline_date(&self) -> Result<Option<String>, IngestError>;

    async fn fragment_count(&self) -> Result<usize, IngestError>;
}
