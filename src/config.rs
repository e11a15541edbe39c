//! Environment-driven settings. Every knob has a default so a bare
//! `cargo run` does something sensible; `.env` files are honored.

use std::path::PathBuf;
use std::time::Duration;

use crate::headlines::{HEADLINES_FEED_URL, MAX_AGE_DAYS};

#[derive(Clone, Debug)]
pub struct Settings {
    pub db_path: PathBuf,
    /// Page cache directory; `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    /// `(url, name)` pairs of section home pages to discover chapters from.
    pub section_pages: Vec<(String, String)>,
    pub feed_url: String,
    /// Token for the article reader proxy.
    pub reader_token: Option<String>,
    pub summary_model: String,
    pub max_headline_age_days: i64,
    /// Cap on chapters per run; `None` means all.
    pub chapter_limit: Option<usize>,
    /// Delay between live chapter fetches.
    pub fetch_delay: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = std::env::var("LEXSMITH_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./lexsmith.sqlite"));

        let cache_dir = match std::env::var("LEXSMITH_CACHE") {
            Ok(value) if value.is_empty() => None,
            Ok(value) => Some(PathBuf::from(value)),
            Err(_) => Some(PathBuf::from("./page_cache")),
        };

        let feed_url =
            std::env::var("LEXSMITH_FEED_URL").unwrap_or_else(|_| HEADLINES_FEED_URL.to_string());

        let reader_token = std::env::var("JINA_API_TOKEN").ok().filter(|t| !t.is_empty());

        let summary_model =
            std::env::var("LEXSMITH_SUMMARY_MODEL").unwrap_or_else(|_| "gpt-5-mini".to_string());

        let max_headline_age_days = std::env::var("LEXSMITH_MAX_AGE_DAYS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(MAX_AGE_DAYS);

        let chapter_limit = std::env::var("LEXSMITH_LIMIT")
            .ok()
            .and_then(|value| value.parse().ok());

        let fetch_delay = std::env::var("LEXSMITH_FETCH_DELAY_MS")
            .ok()
            .and_then(|value| value.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_secs(1));

        Settings {
            db_path,
            cache_dir,
            section_pages: default_section_pages(),
            feed_url,
            reader_token,
            summary_model,
            max_headline_age_days,
            chapter_limit,
            fetch_delay,
        }
    }
}

fn default_section_pages() -> Vec<(String, String)> {
    [
        (
            "https://www.singaporelawwatch.sg/About-Singapore-Law/Overview",
            "Overview",
        ),
        (
            "https://www.singaporelawwatch.sg/About-Singapore-Law/Commercial-Law",
            "Commercial Law",
        ),
        (
            "https://www.singaporelawwatch.sg/About-Singapore-Law/Singapore-Legal-System",
            "Singapore Legal System",
        ),
    ]
    .into_iter()
    .map(|(url, name)| (url.to_string(), name.to_string()))
    .collect()
}
