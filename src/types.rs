//! Shared error type for the ingestion pipelines.

/// Errors surfaced by the I/O layers of the crate.
///
/// The fragmentation core in [`crate::fragments`] is infallible by design;
/// only fetching, parsing, summarization, and persistence produce errors.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("feed error: {0}")]
    Feed(String),

    #[error("summarization failed: {0}")]
    Summarize(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::Io(err.to_string())
    }
}
