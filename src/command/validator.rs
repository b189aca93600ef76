use std::fmt;
use std::process::Stdio;
use std::time::Duration;
use serde::Deserialize;
use tracing::{debug, info, warn};
use crate::errors::RetryConfig;
use crate::interpret::parser::strip_code_fence;
use crate::interpret::prompts;
use crate::llm::{self, LLMProvider};
use crate::utils::truncation::truncate_output;
use super::{Command, ToolCatalog};

pub const DEFAULT_HELP_TIMEOUT: Duration = Duration::from_secs(10);

/// Why validation left the command untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationSkip {
    /// `<tool> --help` could not be run or printed nothing.
    HelpUnavailable(String),
    /// The interpretation service call failed.
    ServiceError(String),
    /// The reply was not `{"corrected_command": "..."}`.
    MalformedResponse(String),
    /// The corrected line failed the allow-list tokenizer or switched tools.
    Rejected(String),
}

impl fmt::Display for ValidationSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HelpUnavailable(why) => write!(f, "help unavailable: {}", why),
            Self::ServiceError(why) => write!(f, "service error: {}", why),
            Self::MalformedResponse(why) => write!(f, "malformed response: {}", why),
            Self::Rejected(why) => write!(f, "correction rejected: {}", why),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Corrected { original: Command, corrected: Command },
    Unchanged(Command),
    Skipped { command: Command, reason: ValidationSkip },
}

impl ValidationOutcome {
    /// The command to execute. Validation never blocks execution.
    pub fn into_command(self) -> Command {
        match self {
            Self::Corrected { corrected, .. } => corrected,
            Self::Unchanged(command) => command,
            Self::Skipped { command, .. } => command,
        }
    }

    pub fn command(&self) -> &Command {
        match self {
            Self::Corrected { corrected, .. } => corrected,
            Self::Unchanged(command) => command,
            Self::Skipped { command, .. } => command,
        }
    }
}

#[derive(Deserialize)]
struct CorrectionReply {
    corrected_command: String,
}

/// Asks the interpretation service to fix a command's syntax against the
/// tool's own `--help` text.
pub struct CommandValidator<'a> {
    llm: &'a dyn LLMProvider,
    catalog: &'a ToolCatalog,
    help_timeout: Duration,
    retry: RetryConfig,
}

impl<'a> CommandValidator<'a> {
    pub fn new(llm: &'a dyn LLMProvider, catalog: &'a ToolCatalog, retry: RetryConfig) -> Self {
        Self { llm, catalog, help_timeout: DEFAULT_HELP_TIMEOUT, retry }
    }

    pub fn with_help_timeout(mut self, timeout: Duration) -> Self {
        self.help_timeout = timeout;
        self
    }

    pub async fn validate(&self, command: Command) -> ValidationOutcome {
        let help = match self.help_text(command.program()).await {
            Ok(help) => help,
            Err(why) => {
                debug!(tool = %command.tool_name(), reason = %why, "Skipping command validation");
                return ValidationOutcome::Skipped {
                    command,
                    reason: ValidationSkip::HelpUnavailable(why),
                };
            }
        };

        let prompt = prompts::validation_prompt(&command, &truncate_output(&help));
        let reply = match llm::ask(self.llm, "validate-command", &prompt, None, &self.retry).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(tool = %command.tool_name(), error = %e, "Validation request failed, keeping command");
                return ValidationOutcome::Skipped {
                    command,
                    reason: ValidationSkip::ServiceError(e.to_string()),
                };
            }
        };

        let corrected_line = match serde_json::from_str::<CorrectionReply>(strip_code_fence(&reply)) {
            Ok(parsed) => parsed.corrected_command,
            Err(e) => {
                debug!(tool = %command.tool_name(), error = %e, "Unparseable correction, keeping command");
                return ValidationOutcome::Skipped {
                    command,
                    reason: ValidationSkip::MalformedResponse(e.to_string()),
                };
            }
        };

        let corrected = match Command::from_suggestion(&corrected_line, self.catalog) {
            Ok(corrected) => corrected,
            Err(e) => {
                warn!(tool = %command.tool_name(), error = %e, "Correction rejected, keeping command");
                return ValidationOutcome::Skipped {
                    command,
                    reason: ValidationSkip::Rejected(e.to_string()),
                };
            }
        };

        if corrected.tool_name() != command.tool_name() {
            return ValidationOutcome::Skipped {
                reason: ValidationSkip::Rejected(format!(
                    "correction switched tool from {} to {}",
                    command.tool_name(),
                    corrected.tool_name()
                )),
                command,
            };
        }

        if corrected == command {
            ValidationOutcome::Unchanged(command)
        } else {
            info!(original = %command, corrected = %corrected, "Command corrected");
            ValidationOutcome::Corrected { original: command, corrected }
        }
    }

    /// Combined stdout/stderr of `<program> --help`. Many tools exit non-zero
    /// on `--help`; that only counts as failure when nothing was printed.
    async fn help_text(&self, program: &str) -> Result<String, String> {
        let child = tokio::process::Command::new(program)
            .arg("--help")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("failed to start {}: {}", program, e))?;

        let output = tokio::time::timeout(self.help_timeout, child.wait_with_output())
            .await
            .map_err(|_| format!("{} --help timed out after {}s", program, self.help_timeout.as_secs()))?
            .map_err(|e| format!("{} --help failed: {}", program, e))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if text.trim().is_empty() {
            return Err(match output.status.code() {
                Some(0) | None => format!("{} --help printed nothing", program),
                Some(code) => format!("{} --help exited with {} and no output", program, code),
            });
        }
        Ok(text)
    }
}
