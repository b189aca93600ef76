use std::path::{Path, PathBuf};
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use crate::errors::TriageError;

/// Append-only, human-readable event log kept next to the session artifacts.
pub struct WorkflowLogger {
    path: PathBuf,
}

impl WorkflowLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs against the same target share one log, so a header is appended
    /// rather than truncating earlier runs.
    pub async fn initialize(&self, target: &str, run_id: &str) -> Result<(), TriageError> {
        let header = format!(
            "# Triage Workflow Log\n# Target: {}\n# Run: {}\n# Started: {}\n\n",
            target,
            run_id,
            Utc::now().to_rfc3339()
        );
        self.append(&header).await
    }

    pub async fn log_event(&self, message: &str) -> Result<(), TriageError> {
        let line = format!("[{}] {}\n", Utc::now().format("%H:%M:%S"), message);
        self.append(&line).await
    }

    async fn append(&self, text: &str) -> Result<(), TriageError> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true).append(true).open(&self.path).await?;
        file.write_all(text.as_bytes()).await?;
        Ok(())
    }
}
