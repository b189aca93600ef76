use std::path::PathBuf;
use tracing::{info, warn};
use crate::errors::{RetryConfig, TriageError};
use crate::interpret::prompts;
use crate::llm::{self, LLMProvider};
use crate::session::SessionLayout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutiveSummary {
    /// `summary.md` does not exist; the service was not called.
    NothingToSummarize,
    Written { path: PathBuf, content: String },
}

/// Produces `summary_exec.md` from the accumulated tool summaries and exploit results.
pub struct ExecutiveSummarizer<'a> {
    llm: &'a dyn LLMProvider,
    retry: RetryConfig,
}

impl<'a> ExecutiveSummarizer<'a> {
    pub fn new(llm: &'a dyn LLMProvider, retry: RetryConfig) -> Self {
        Self { llm, retry }
    }

    pub async fn summarize(&self, target: &str, layout: &SessionLayout) -> Result<ExecutiveSummary, TriageError> {
        let summary_path = layout.summary();
        let summaries = match tokio::fs::read_to_string(&summary_path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %summary_path.display(), "No summary document, skipping executive summary");
                return Ok(ExecutiveSummary::NothingToSummarize);
            }
            Err(e) => return Err(e.into()),
        };
        let exploits = match tokio::fs::read_to_string(layout.exploits()).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let prompt = prompts::executive_prompt(target, &summaries, &exploits);
        let content = llm::ask(self.llm, "executive_summary", &prompt, Some(prompts::ANALYST_SYSTEM), &self.retry).await?;

        let path = layout.executive_summary();
        tokio::fs::write(&path, &content).await?;
        info!(path = %path.display(), chars = content.len(), "Executive summary written");
        Ok(ExecutiveSummary::Written { path, content })
    }
}
