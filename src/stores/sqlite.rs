//! SQLite persistence via `tokio-rusqlite`.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use tokio_rusqlite::{Connection, OptionalExtension};

use crate::types::IngestError;

use super::{Backend, ChapterRecord, FragmentRecord, HeadlineRecord};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS chapters (
    id             TEXT PRIMARY KEY,
    url            TEXT NOT NULL,
    title          TEXT NOT NULL,
    section        TEXT NOT NULL,
    last_scraped   TEXT NOT NULL,
    content_length INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_chapters_url ON chapters(url);

CREATE TABLE IF NOT EXISTS chapter_fragments (
    id             TEXT PRIMARY KEY,
    chapter_id     TEXT NOT NULL,
    fragment_order INTEGER NOT NULL,
    content        TEXT NOT NULL,
    char_count     INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_fragments_chapter ON chapter_fragments(chapter_id);

CREATE TABLE IF NOT EXISTS headlines (
    id          TEXT PRIMARY KEY,
    category    TEXT NOT NULL,
    title       TEXT NOT NULL,
    source_link TEXT NOT NULL,
    author      TEXT NOT NULL,
    date        TEXT NOT NULL,
    imported_on TEXT NOT NULL,
    text        TEXT NOT NULL,
    summary     TEXT NOT NULL
);
";

/// SQLite-backed store for all three record kinds.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (and if necessary creates) the database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let conn = Connection::open(path)
            .await
            .map_err(|err| IngestError::Storage(err.to_string()))?;

        conn.call(|conn| conn.execute_batch(SCHEMA))
        .await
        .map_err(|err| IngestError::Storage(err.to_string()))?;

        Ok(Self { conn })
    }

    /// Underlying connection, for queries the trait does not cover.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl Backend for SqliteStore {
    async fn upsert_chapters(&self, chapters: Vec<ChapterRecord>) -> Result<(), IngestError> {
        if chapters.is_empty() {
            return Ok(());
        }
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for chapter in chapters {
                    tx.execute(
                        "INSERT OR REPLACE INTO chapters \
                         (id, url, title, section, last_scraped, content_length) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                        (
                            &chapter.id,
                            &chapter.url,
                            &chapter.title,
                            &chapter.section,
                            &chapter.last_scraped,
                            chapter.content_length as i64,
                        ),
                    )
                    ?;
                }
                tx.commit()
            })
            .await
            .map_err(|err| IngestError::Storage(err.to_string()))
    }

    async fn upsert_fragments(&self, fragments: Vec<FragmentRecord>) -> Result<(), IngestError> {
        if fragments.is_empty() {
            return Ok(());
        }
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for fragment in fragments {
                    tx.execute(
                        "INSERT OR REPLACE INTO chapter_fragments \
                         (id, chapter_id, fragment_order, content, char_count) \
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        (
                            &fragment.id,
                            &fragment.chapter_id,
                            fragment.fragment_order as i64,
                            &fragment.content,
                            fragment.char_count as i64,
                        ),
                    )
                    ?;
                }
                tx.commit()
            })
            .await
            .map_err(|err| IngestError::Storage(err.to_string()))
    }

    async fn upsert_headlines(&self, headlines: Vec<HeadlineRecord>) -> Result<(), IngestError> {
        if headlines.is_empty() {
            return Ok(());
        }
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for headline in headlines {
                    tx.execute(
                        "INSERT OR REPLACE INTO headlines \
                         (id, category, title, source_link, author, date, imported_on, text, summary) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                        (
                            &headline.id,
                            &headline.category,
                            &headline.title,
                            &headline.source_link,
                            &headline.author,
                            &headline.date,
                            &headline.imported_on,
                            &headline.text,
                            &headline.summary,
                        ),
                    )
                    ?;
                }
                tx.commit()
            })
            .await
            .map_err(|err| IngestError::Storage(err.to_string()))
    }

    async fn chapter_urls(&self) -> Result<HashSet<String>, IngestError> {
        self.conn
            .call(|conn| -> Result<HashSet<String>, tokio_rusqlite::Error> {
                let mut stmt = conn
                    .prepare("SELECT url FROM chapters")
                    ?;
                let rows = stmt
                    .query_map([], |row| row.get::<_, String>(0))
                    ?;

                let mut urls = HashSet::new();
                for row in rows {
                    urls.insert(row?);
                }
                Ok(urls)
            })
            .await
            .map_err(|err| IngestError::Storage(err.to_string()))
    }

    async fn fragments_for_chapter(
        &self,
        chapter_id: &str,
    ) -> Result<Vec<FragmentRecord>, IngestError> {
        let chapter_id = chapter_id.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<FragmentRecord>, tokio_rusqlite::Error> {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, chapter_id, fragment_order, content, char_count \
                         FROM chapter_fragments WHERE chapter_id = ?1 ORDER BY fragment_order",
                    )
                    ?;

                let rows = stmt
                    .query_map([&chapter_id], |row| {
                        Ok(FragmentRecord {
                            id: row.get(0)?,
                            chapter_id: row.get(1)?,
                            fragment_order: row.get::<_, i64>(2)? as usize,
                            content: row.get(3)?,
                            char_count: row.get::<_, i64>(4)? as usize,
                        })
                    })
                    ?;

                let mut fragments = Vec::new();
                for row in rows {
                    fragments.push(row?);
                }
                Ok(fragments)
            })
            .await
            .map_err(|err| IngestError::Storage(err.to_string()))
    }

    async fn headline_ids(&self) -> Result<HashSet<String>, IngestError> {
        self.conn
            .call(|conn| -> Result<HashSet<String>, tokio_rusqlite::Error> {
                let mut stmt = conn
                    .prepare("SELECT id FROM headlines")
                    ?;
                let rows = stmt
                    .query_map([], |row| row.get::<_, String>(0))
                    ?;

                let mut ids = HashSet::new();
                for row in rows {
                    ids.insert(row?);
                }
                Ok(ids)
            })
            .await
            .map_err(|err| IngestError::Storage(err.to_string()))
    }

    async fn latest_headline_date(&self) -> Result<Option<String>, IngestError> {
        self.conn
            .call(|conn| {
                conn.query_row("SELECT MAX(date) FROM headlines", [], |row| {
                    row.get::<_, Option<String>>(0)
                })
                .optional()
                .map(Option::flatten)
            })
            .await
            .map_err(|err| IngestError::Storage(err.to_string()))
    }

    async fn fragment_count(&self) -> Result<usize, IngestError> {
        self.conn
            .call(|conn| -> Result<usize, tokio_rusqlite::Error> {
                let count: i64 = conn
                    .query_row("SELECT COUNT(*) FROM chapter_fragments", [], |row| {
                        row.get(0)
                    })
                    ?;
                Ok(count as usize)
            })
            .await
            .map_err(|err| IngestError::Storage(err.to_string()))
    }
}
