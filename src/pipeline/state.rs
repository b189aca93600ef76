use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;
use crate::capture::DEFAULT_COMMAND_TIMEOUT;
use crate::command::{ToolCatalog, DEFAULT_HELP_TIMEOUT};
use crate::errors::RetryConfig;
use crate::exploits::{CrossReferenceReport, DEFAULT_EXPLOIT_TOOL, DEFAULT_LOOKUP_TIMEOUT};
use crate::interpret::ServiceSignature;
use crate::session::DEFAULT_TRIAGE_ROOT;
use super::phase::WorkflowPhase;

pub const DEFAULT_MAX_DEPTH: usize = 1;

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub triage_root: PathBuf,
    /// Levels of recommendations to run after the initial scan.
    pub max_depth: usize,
    pub command_timeout: Duration,
    pub help_timeout: Duration,
    pub validate_commands: bool,
    pub live_tail: bool,
    pub quiet: bool,
    pub exploit_tool: String,
    pub exploit_args: Vec<String>,
    pub exploit_timeout: Duration,
    pub retry: RetryConfig,
    pub catalog: ToolCatalog,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            triage_root: PathBuf::from(DEFAULT_TRIAGE_ROOT),
            max_depth: DEFAULT_MAX_DEPTH,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            help_timeout: DEFAULT_HELP_TIMEOUT,
            validate_commands: true,
            live_tail: true,
            quiet: false,
            exploit_tool: DEFAULT_EXPLOIT_TOOL.to_string(),
            exploit_args: Vec::new(),
            exploit_timeout: DEFAULT_LOOKUP_TIMEOUT,
            retry: RetryConfig::default(),
            catalog: ToolCatalog::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCommand {
    pub command: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryStatus {
    Written { path: PathBuf, content: String },
    NothingToSummarize,
    Failed(String),
}

/// What a finished run did, in the order it happened.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    pub run_id: String,
    pub target: String,
    pub session_dir: PathBuf,
    pub phases: Vec<WorkflowPhase>,
    pub executed: Vec<String>,
    pub skipped: Vec<SkippedCommand>,
    pub interpreted: usize,
    pub services: BTreeSet<ServiceSignature>,
    pub cross_reference: Option<CrossReferenceReport>,
    pub summary: SummaryStatus,
    pub duration: Duration,
}

impl WorkflowReport {
    pub fn new(target: &str, session_dir: PathBuf) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            target: target.to_string(),
            session_dir,
            phases: Vec::new(),
            executed: Vec::new(),
            skipped: Vec::new(),
            interpreted: 0,
            services: BTreeSet::new(),
            cross_reference: None,
            summary: SummaryStatus::NothingToSummarize,
            duration: Duration::ZERO,
        }
    }

    pub fn skip(&mut self, command: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedCommand { command: command.into(), reason: reason.into() });
    }

    pub fn visited(&self, phase: WorkflowPhase) -> bool {
        self.phases.contains(&phase)
    }
}
