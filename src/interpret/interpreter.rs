use std::path::Path;
use tracing::{debug, info, warn};
use crate::capture::ExecutionRecord;
use crate::command::ToolCatalog;
use crate::errors::RetryConfig;
use crate::llm::{self, LLMProvider};
use crate::reporting::summary::append_tool_summary;
use super::parser::{parse_reply, InterpretationResult, ParsedReply};
use super::prompts;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    /// A valid three-key result; `repaired` when it took the repair request.
    Findings { result: InterpretationResult, repaired: bool },
    /// The service answered `None`: output not usable for analysis.
    Unusable,
    /// No structured result, even after repair.
    Failed { reason: String },
}

impl Interpretation {
    pub fn result(&self) -> Option<&InterpretationResult> {
        match self {
            Self::Findings { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn into_result(self) -> Option<InterpretationResult> {
        match self {
            Self::Findings { result, .. } => Some(result),
            _ => None,
        }
    }
}

/// Turns captured tool output into an [`InterpretationResult`] via the
/// interpretation service, with a single repair request on malformed replies.
pub struct ResponseInterpreter<'a> {
    llm: &'a dyn LLMProvider,
    catalog: &'a ToolCatalog,
    retry: RetryConfig,
}

impl<'a> ResponseInterpreter<'a> {
    pub fn new(llm: &'a dyn LLMProvider, catalog: &'a ToolCatalog, retry: RetryConfig) -> Self {
        Self { llm, catalog, retry }
    }

    /// Interpret one run. On success a block is appended to `summary_path`.
    pub async fn interpret(
        &self,
        record: &ExecutionRecord,
        exclusions: &[String],
        summary_path: &Path,
    ) -> Interpretation {
        let tool = record.command.tool_name();
        let output = match tokio::fs::read_to_string(&record.output_path).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool, path = %record.output_path.display(), error = %e, "Cannot read captured output");
                return Interpretation::Failed { reason: format!("cannot read output: {}", e) };
            }
        };

        let prompt = prompts::analysis_prompt(&record.command, &output, self.catalog, exclusions);
        let reply = match llm::ask(self.llm, "interpret", &prompt, Some(prompts::ANALYST_SYSTEM), &self.retry).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(tool, error = %e, "Interpretation request failed");
                return Interpretation::Failed { reason: e.to_string() };
            }
        };

        let interpretation = match parse_reply(&reply) {
            Ok(ParsedReply::Result(result)) => Interpretation::Findings { result, repaired: false },
            Ok(ParsedReply::Unusable) => {
                info!(tool, "Output judged unusable for analysis");
                Interpretation::Unusable
            }
            Err(e) => {
                warn!(tool, error = %e, "Malformed interpretation reply, attempting repair");
                self.repair(tool, &reply).await
            }
        };

        if let Interpretation::Findings { result, .. } = &interpretation {
            if let Err(e) = append_tool_summary(summary_path, tool, result).await {
                warn!(tool, path = %summary_path.display(), error = %e, "Failed to append tool summary");
            }
        }
        interpretation
    }

    /// Exactly one attempt; whatever comes back is final.
    async fn repair(&self, tool: &str, malformed: &str) -> Interpretation {
        let prompt = prompts::repair_prompt(malformed);
        let reply = match llm::ask(self.llm, "repair", &prompt, None, &self.retry).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(tool, error = %e, "Repair request failed");
                return Interpretation::Failed { reason: e.to_string() };
            }
        };

        match parse_reply(&reply) {
            Ok(ParsedReply::Result(result)) => {
                debug!(tool, "Repair produced a valid result");
                Interpretation::Findings { result, repaired: true }
            }
            Ok(ParsedReply::Unusable) => Interpretation::Unusable,
            Err(e) => {
                warn!(tool, error = %e, "Repair failed, no findings for this command");
                Interpretation::Failed { reason: e.to_string() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use crate::capture::ExecStatus;
    use crate::command::Command;
    use crate::llm::testing::ScriptedProvider;
    use tempfile::TempDir;

    const VALID: &str = r#"{"summary": "- http on 80", "recommended_steps": ["gobuster dir -u http://x -w list.txt"], "services_found": ["apache 2.4.41"]}"#;

    fn record(dir: &Path, output: &str) -> ExecutionRecord {
        let output_path: PathBuf = dir.join("nmap.txt");
        std::fs::write(&output_path, output).unwrap();
        ExecutionRecord {
            command: Command::new(["nmap", "-sV", "10.0.0.1"]).unwrap(),
            output_path,
            truncated: false,
            status: ExecStatus::Completed { exit_code: Some(0) },
            tokens_captured: 4,
            duration: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_valid_reply_appends_summary() {
        let dir = TempDir::new().unwrap();
        let llm = ScriptedProvider::new(&[VALID]);
        let catalog = ToolCatalog::default();
        let interpreter = ResponseInterpreter::new(&llm, &catalog, RetryConfig::none());
        let summary = dir.path().join("summary.md");

        let outcome = interpreter.interpret(&record(dir.path(), "80/tcp open http"), &[], &summary).await;

        let result = outcome.result().unwrap();
        assert_eq!(result.services_found, vec!["apache 2.4.41"]);
        assert!(matches!(outcome, Interpretation::Findings { repaired: false, .. }));
        let written = std::fs::read_to_string(&summary).unwrap();
        assert!(written.starts_with("## nmap\nSummary:\n- http on 80\n"));
        assert_eq!(llm.calls(), 1);
        assert!(llm.prompts()[0].contains("80/tcp open http"));
    }

    #[tokio::test]
    async fn test_fenced_reply_needs_no_repair() {
        let dir = TempDir::new().unwrap();
        let fenced = format!("```json\n{}\n```", VALID);
        let llm = ScriptedProvider::new(&[&fenced]);
        let catalog = ToolCatalog::default();
        let interpreter = ResponseInterpreter::new(&llm, &catalog, RetryConfig::none());

        let outcome = interpreter
            .interpret(&record(dir.path(), "x"), &[], &dir.path().join("summary.md"))
            .await;

        assert!(matches!(outcome, Interpretation::Findings { repaired: false, .. }));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_none_reply_is_unusable_without_repair() {
        let dir = TempDir::new().unwrap();
        let llm = ScriptedProvider::new(&["None"]);
        let catalog = ToolCatalog::default();
        let interpreter = ResponseInterpreter::new(&llm, &catalog, RetryConfig::none());
        let summary = dir.path().join("summary.md");

        let outcome = interpreter.interpret(&record(dir.path(), "garbage"), &[], &summary).await;

        assert_eq!(outcome, Interpretation::Unusable);
        assert_eq!(llm.calls(), 1);
        assert!(!summary.exists());
    }

    #[tokio::test]
    async fn test_single_repair_recovers() {
        let dir = TempDir::new().unwrap();
        let llm = ScriptedProvider::new(&["{summary: broken", VALID]);
        let catalog = ToolCatalog::default();
        let interpreter = ResponseInterpreter::new(&llm, &catalog, RetryConfig::none());

        let outcome = interpreter
            .interpret(&record(dir.path(), "x"), &[], &dir.path().join("summary.md"))
            .await;

        assert!(matches!(outcome, Interpretation::Findings { repaired: true, .. }));
        assert_eq!(llm.calls(), 2);
        assert!(llm.prompts()[1].contains("{summary: broken"));
    }

    #[tokio::test]
    async fn test_repair_failure_is_final() {
        let dir = TempDir::new().unwrap();
        // A third reply is queued to prove it is never requested.
        let llm = ScriptedProvider::new(&["not json", "still not json", VALID]);
        let catalog = ToolCatalog::default();
        let interpreter = ResponseInterpreter::new(&llm, &catalog, RetryConfig::none());
        let summary = dir.path().join("summary.md");

        let outcome = interpreter.interpret(&record(dir.path(), "x"), &[], &summary).await;

        assert!(matches!(outcome, Interpretation::Failed { .. }));
        assert_eq!(llm.calls(), 2);
        assert!(outcome.into_result().is_none());
        assert!(!summary.exists());
    }

    #[tokio::test]
    async fn test_missing_key_triggers_repair() {
        let dir = TempDir::new().unwrap();
        let llm = ScriptedProvider::new(&[r#"{"summary": "x", "recommended_steps": []}"#, VALID]);
        let catalog = ToolCatalog::default();
        let interpreter = ResponseInterpreter::new(&llm, &catalog, RetryConfig::none());

        let outcome = interpreter
            .interpret(&record(dir.path(), "x"), &[], &dir.path().join("summary.md"))
            .await;

        assert!(matches!(outcome, Interpretation::Findings { repaired: true, .. }));
    }

    #[tokio::test]
    async fn test_exclusions_reach_the_prompt() {
        let dir = TempDir::new().unwrap();
        let llm = ScriptedProvider::new(&["None"]);
        let catalog = ToolCatalog::default();
        let interpreter = ResponseInterpreter::new(&llm, &catalog, RetryConfig::none());
        let exclusions = vec!["nmap -sV 10.0.0.1".to_string(), "whatweb http://10.0.0.1".to_string()];

        interpreter
            .interpret(&record(dir.path(), "x"), &exclusions, &dir.path().join("summary.md"))
            .await;

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("- nmap -sV 10.0.0.1"));
        assert!(prompt.contains("- whatweb http://10.0.0.1"));
    }

    #[tokio::test]
    async fn test_service_error_is_failed_without_repair() {
        let dir = TempDir::new().unwrap();
        let llm = ScriptedProvider::new(&[]);
        llm.push_error("upstream down");
        let catalog = ToolCatalog::default();
        let interpreter = ResponseInterpreter::new(&llm, &catalog, RetryConfig::none());

        let outcome = interpreter
            .interpret(&record(dir.path(), "x"), &[], &dir.path().join("summary.md"))
            .await;

        assert!(matches!(outcome, Interpretation::Failed { .. }));
        assert_eq!(llm.calls(), 1);
    }
}
