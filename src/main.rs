use std::process::ExitCode;

use tracing::warn;
use tracing_subscriber::FmtSubscriber;

use lexsmith::config::Settings;
use lexsmith::headlines::{self, RigSummarizer, Summarizer};
use lexsmith::ingestion::{self, PageCache};
use lexsmith::stores::SqliteStore;
use lexsmith::types::IngestError;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let mode = std::env::args().nth(1).unwrap_or_else(|| "chapters".to_string());
    let settings = Settings::from_env();

    let result = match mode.as_str() {
        "chapters" => run_chapters(&settings).await,
        "headlines" => run_headlines(&settings).await,
        other => {
            eprintln!("unknown command '{other}'; expected 'chapters' or 'headlines'");
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run_chapters(settings: &Settings) -> Result<(), IngestError> {
    let client = http_client()?;
    let store = SqliteStore::open(&settings.db_path).await?;

    let cache = match &settings.cache_dir {
        Some(dir) => {
            tokio::fs::create_dir_all(dir).await?;
            Some(PageCache::new(dir.clone()))
        }
        None => None,
    };

    let mut links = ingestion::discover_chapters(&client, &settings.section_pages).await;
    if let Some(limit) = settings.chapter_limit {
        links.truncate(limit);
    }
    println!("Found {} chapters to process", links.len());

    let summary = ingestion::ingest_chapters(
        &client,
        &store,
        cache.as_ref(),
        links,
        settings.fetch_delay,
    )
    .await?;

    println!("Chapter run complete");
    println!("  processed : {}", summary.chapters_processed);
    println!("  skipped   : {}", summary.chapters_skipped);
    println!("  failed    : {}", summary.chapters_failed);
    println!("  fragments : {}", summary.fragments_written);
    println!("  database  : {}", settings.db_path.display());

    Ok(())
}

async fn run_headlines(settings: &Settings) -> Result<(), IngestError> {
    let client = http_client()?;
    let store = SqliteStore::open(&settings.db_path).await?;

    let summarizer: Box<dyn Summarizer> = match RigSummarizer::from_env(&settings.summary_model) {
        Ok(summarizer) => Box::new(summarizer),
        Err(err) => {
            warn!(error = %err, "summarizer unavailable, falling back to title summaries");
            Box::new(UnavailableSummarizer)
        }
    };

    let summary = headlines::ingest_headlines(
        &client,
        &store,
        summarizer.as_ref(),
        settings.reader_token.as_deref(),
        &settings.feed_url,
        settings.max_headline_age_days,
    )
    .await?;

    println!("Headline run complete");
    println!("  added         : {}", summary.processed);
    println!("  ads skipped   : {}", summary.skipped_ads);
    println!("  old skipped   : {}", summary.skipped_old);
    println!("  time skipped  : {}", summary.skipped_by_time);
    println!("  dupes skipped : {}", summary.skipped_by_id);
    println!("  database      : {}", settings.db_path.display());

    Ok(())
}

fn http_client() -> Result<reqwest::Client, IngestError> {
    Ok(reqwest::Client::builder()
        .user_agent("lexsmith-ingestor/0.1")
        .use_rustls_tls()
        .build()?)
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let subscriber = FmtSubscriber::builder().with_env_filter("info").finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Stand-in when no LLM credentials are configured; every entry then takes
/// the title-derived fallback summary path.
struct UnavailableSummarizer;

#[async_trait::async_trait]
impl Summarizer for UnavailableSummarizer {
    async fn summarize(&self, _article_text: &str) -> Result<String, IngestError> {
        Err(IngestError::Summarize(
            "no summarizer configured".to_string(),
        ))
    }
}
