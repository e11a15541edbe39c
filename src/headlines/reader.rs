//! Article-content fetching through a reader proxy.

use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;
use tracing::warn;

use crate::types::IngestError;

const READER_BASE: &str = "https://r.jina.ai/";

const MAX_ATTEMPTS: u32 = 3;

/// URL patterns the reader proxy is known to choke on; these skip the proxy
/// entirely and go straight to fallback content.
const SKIP_PATTERNS: [&str; 2] = ["store.lawnet.com", "utm_source="];

/// Should this URL bypass the reader proxy?
pub fn is_problematic_url(url: &str) -> bool {
    SKIP_PATTERNS.iter().any(|pattern| url.contains(pattern))
}

/// Fallback article text when the reader proxy cannot deliver.
pub fn fallback_text(title: &str, source_url: &str) -> String {
    format!(
        "Article: {title}\nSource: {source_url}\n\nContent could not be retrieved from source."
    )
}

/// Fetches the readable article text behind `link` via the reader proxy.
///
/// Without a token the proxy rejects requests, so an empty string comes back
/// immediately. Transient failures retry up to three attempts with
/// exponential backoff.
pub async fn fetch_article_text(
    client: &Client,
    token: Option<&str>,
    link: &str,
) -> Result<String, IngestError> {
    let Some(token) = token else {
        warn!("reader token not set, skipping article fetch");
        return Ok(String::new());
    };

    let reader_url = format!("{READER_BASE}{link}");
    let mut last_error = None;

    for attempt in 0..MAX_ATTEMPTS {
        if attempt > 0 {
            // 2s, then 4s, capped well below the proxy's own timeout.
            let backoff = Duration::from_secs(2u64.pow(attempt).min(10));
            sleep(backoff).await;
        }

        let result = client
            .get(&reader_url)
            .bearer_auth(token)
            .header("X-Retain-Images", "none")
            .header("X-Target-Selector", "article")
            .timeout(Duration::from_secs(90))
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match result {
            Ok(response) => return Ok(response.text().await?),
            Err(err) => {
                warn!(attempt = attempt + 1, error = %err, "reader fetch failed");
                last_error = Some(err);
            }
        }
    }

    Err(last_error
        .map(IngestError::from)
        .unwrap_or_else(|| IngestError::Feed("reader fetch failed".to_string())))
}
