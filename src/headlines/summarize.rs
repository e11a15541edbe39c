//! Article summarization behind a seam, so pipelines and tests can swap the
//! LLM for a deterministic implementation.

use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::openai;

use crate::types::IngestError;

/// Preamble steering summaries toward time-constrained attorneys.
pub const SUMMARY_SYSTEM_PROMPT: &str = "As an expert in legal affairs, your task is to provide \
summaries of legal news articles for time-constrained attorneys in an engaging, conversational \
style. These summaries should highlight the critical legal aspects, relevant precedents, and \
implications of the issues discussed in the articles. The summary should be in 1 narrative \
paragraph and should not be longer than 100 words, but ensure they efficiently deliver the key \
legal insights, making them beneficial for quick comprehension. The end goal is to help the \
lawyers understand the crux of the articles without having to read them in their entirety.";

/// Produces a one-paragraph summary of an article.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, article_text: &str) -> Result<String, IngestError>;
}

/// LLM-backed summarizer.
pub struct RigSummarizer {
    agent: rig::agent::Agent<openai::responses_api::ResponsesCompletionModel>,
}

impl RigSummarizer {
    /// Builds the summarizer from `OPENAI_API_KEY`.
    pub fn from_env(model: &str) -> Result<Self, IngestError> {
        if std::env::var("OPENAI_API_KEY").is_err() {
            return Err(IngestError::Summarize(
                "OPENAI_API_KEY environment variable not set".to_string(),
            ));
        }

        let client = openai::Client::from_env();
        let agent = client
            .agent(model)
            .preamble(SUMMARY_SYSTEM_PROMPT)
            .build();

        Ok(Self { agent })
    }
}

#[async_trait]
impl Summarizer for RigSummarizer {
    async fn summarize(&self, article_text: &str) -> Result<String, IngestError> {
        let prompt = format!("Here is an article to summarise:\n {article_text}");
        self.agent
            .prompt(prompt)
            .await
            .map_err(|err| IngestError::Summarize(err.to_string()))
    }
}

/// Fallback summary built from the headline alone.
pub fn fallback_summary(title: &str) -> String {
    let truncated: String = title.chars().take(100).collect();
    let ellipsis = if title.chars().count() > 100 { "..." } else { "" };
    format!("Legal news article: {truncated}{ellipsis}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_summary_truncates_long_titles() {
        let long_title = "T".repeat(150);
        let summary = fallback_summary(&long_title);
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= "Legal news article: ".chars().count() + 103);

        let short = fallback_summary("Short title");
        assert_eq!(short, "Legal news article: Short title");
    }
}
