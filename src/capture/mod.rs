pub mod estimator;
pub mod runner;

use std::path::PathBuf;
use std::time::Duration;
use crate::command::Command;

pub use estimator::{TokenEstimator, WordPunctEstimator};
pub use runner::{BoundedOutputCapture, token_budget, timeout_marker, TRUNCATION_MARKER};

/// Hard wall-clock bound on a single tool run.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Tokens reserved for the prompt text wrapped around captured output.
pub const PROMPT_SAFETY_MARGIN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecStatus {
    Completed { exit_code: Option<i32> },
    TimedOut,
    FailedToStart { reason: String },
}

/// Outcome of one tool invocation. Built once the process has ended.
#[derive(Debug, Clone)]
pub struct ExecutionRecord {
    pub command: Command,
    pub output_path: PathBuf,
    pub truncated: bool,
    pub status: ExecStatus,
    pub tokens_captured: usize,
    pub duration: Duration,
}

impl ExecutionRecord {
    /// Whether a process was actually launched.
    pub fn spawned(&self) -> bool {
        !matches!(self.status, ExecStatus::FailedToStart { .. })
    }

    /// Only completed runs are worth interpreting.
    pub fn is_completed(&self) -> bool {
        matches!(self.status, ExecStatus::Completed { .. })
    }
}
