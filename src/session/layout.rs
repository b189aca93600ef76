use std::path::{Path, PathBuf};
use crate::errors::TriageError;

pub const DEFAULT_TRIAGE_ROOT: &str = "/mnt/triage";

/// Where a target's artifacts live: `<root>/<target>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLayout {
    dir: PathBuf,
}

impl SessionLayout {
    pub fn new(triage_root: &Path, target: &str) -> Result<Self, TriageError> {
        validate_target(target)?;
        Ok(Self { dir: triage_root.join(target) })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn tool_output(&self, tool: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", tool))
    }

    pub fn summary(&self) -> PathBuf {
        self.dir.join("summary.md")
    }

    pub fn exploits(&self) -> PathBuf {
        self.dir.join("exploits.txt")
    }

    pub fn executive_summary(&self) -> PathBuf {
        self.dir.join("summary_exec.md")
    }

    pub fn workflow_log(&self) -> PathBuf {
        self.dir.join("workflow.log")
    }

    pub async fn ensure(&self) -> Result<(), TriageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }
}

/// The target becomes a directory name, so it must be a single path component.
pub fn validate_target(target: &str) -> Result<(), TriageError> {
    let trimmed = target.trim();
    if trimmed.is_empty() {
        return Err(TriageError::InvalidTarget("target is empty".into()));
    }
    if trimmed != target {
        return Err(TriageError::InvalidTarget(format!("target has surrounding whitespace: '{}'", target)));
    }
    if target == "." || target == ".." || target.contains(['/', '\\', '\0']) {
        return Err(TriageError::InvalidTarget(format!("target is not a plain host identifier: {}", target)));
    }
    if target.starts_with('-') {
        return Err(TriageError::InvalidTarget(format!("target looks like an option: {}", target)));
    }
    Ok(())
}
