//! Fetching and caching of source pages.

use std::path::{Path, PathBuf};

use reqwest::Client;
use tokio::fs;
use url::Url;

use crate::types::IngestError;

/// Filesystem-backed cache for downloaded pages.
///
/// URLs normalize into deterministic file names so repeated runs reuse
/// previously downloaded pages instead of hitting the network again.
#[derive(Clone, Debug)]
pub struct PageCache {
    root: PathBuf,
}

impl PageCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache file path for a given URL.
    pub fn page_path(&self, url: &Url) -> PathBuf {
        let mut name: String = url
            .path()
            .trim_start_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(sanitize)
            .collect::<Vec<_>>()
            .join("_");

        if name.is_empty() {
            name.push_str("index");
        }
        if let Some(query) = url.query() {
            name.push('_');
            name.push_str(&sanitize(query));
        }
        if Path::new(&name).extension().is_none() {
            name.push_str(".html");
        }

        self.root.join(name)
    }
}

/// A fetched page, with provenance.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub html: String,
    pub bytes: usize,
    pub from_cache: bool,
}

/// Fetches `url`, reading through `cache` when one is provided.
///
/// A cache hit is served from disk without any network request; a miss is
/// downloaded and written through before returning.
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    cache: Option<&PageCache>,
) -> Result<FetchedPage, IngestError> {
    if let Some(cache) = cache {
        let path = cache.page_path(url);
        if path.exists() {
            let html = fs::read_to_string(&path).await?;
            return Ok(FetchedPage {
                url: url.clone(),
                bytes: html.len(),
                html,
                from_cache: true,
            });
        }

        let html = download(client, url).await?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &html).await?;
        return Ok(FetchedPage {
            url: url.clone(),
            bytes: html.len(),
            html,
            from_cache: false,
        });
    }

    let html = download(client, url).await?;
    Ok(FetchedPage {
        url: url.clone(),
        bytes: html.len(),
        html,
        from_cache: false,
    })
}

async fn download(client: &Client, url: &Url) -> Result<String, IngestError> {
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

fn sanitize(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
