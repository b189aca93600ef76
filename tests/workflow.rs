#![cfg(unix)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use tempfile::TempDir;
use triage::command::{Command, ToolCatalog};
use triage::errors::{RetryConfig, TriageError};
use triage::llm::{LLMProvider, LLMResponse};
use triage::pipeline::{SummaryStatus, WorkflowConfig, WorkflowOrchestrator, WorkflowPhase};

struct CannedProvider {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl CannedProvider {
    fn new(replies: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for CannedProvider {
    async fn complete(&self, prompt: &str, _system: Option<&str>) -> Result<LLMResponse, TriageError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(text) => Ok(LLMResponse::text(text, "canned")),
            None => Err(TriageError::LLMApi("no canned reply left".into())),
        }
    }

    fn context_length(&self) -> usize { 2048 }
    fn provider_name(&self) -> &str { "canned" }
    fn model_name(&self) -> &str { "canned" }
}

fn config(root: &Path) -> WorkflowConfig {
    WorkflowConfig {
        triage_root: root.to_path_buf(),
        command_timeout: Duration::from_secs(10),
        validate_commands: false,
        live_tail: false,
        quiet: true,
        exploit_tool: "echo".into(),
        retry: RetryConfig::none(),
        catalog: ToolCatalog::new(["printf", "echo", "sh"]),
        ..WorkflowConfig::default()
    }
}

fn interpretation(steps: &[&str], services: &[&str]) -> String {
    serde_json::json!({
        "summary": ["- port 80 open", "- apache detected"],
        "recommended_steps": steps,
        "services_found": services,
    })
    .to_string()
}

#[tokio::test]
async fn full_run_writes_every_artifact() {
    let root = TempDir::new().unwrap();
    let llm = CannedProvider::new(vec![
        format!("```json\n{}\n```", interpretation(&["echo http-title"], &["apache 2.4.41"])),
        interpretation(&[], &["apache 2.4.41"]),
        "# Executive Summary\n\nApache 2.4.41 exposed.".to_string(),
    ]);

    let report = WorkflowOrchestrator::new(config(root.path()), llm.clone())
        .with_initial_scan(Command::new(["printf", "80/tcp open http Apache httpd 2.4.41\\n"]).unwrap())
        .run("box.htb")
        .await
        .unwrap();

    let session = root.path().join("box.htb");
    assert_eq!(report.session_dir, session);
    assert!(session.join("printf.txt").exists());
    assert_eq!(std::fs::read_to_string(session.join("echo.txt")).unwrap(), "http-title\n");

    let summary = std::fs::read_to_string(session.join("summary.md")).unwrap();
    assert!(summary.starts_with("## printf\nSummary:\n- port 80 open\n- apache detected\nRecommended steps:\necho http-title\n\n"));
    assert!(summary.contains("## echo\n"));

    // Same signature twice collapses to one lookup.
    let exploits = std::fs::read_to_string(session.join("exploits.txt")).unwrap();
    assert_eq!(exploits, "### apache 2.4.41 ###\napache 2.4.41\n\n");

    assert_eq!(
        std::fs::read_to_string(session.join("summary_exec.md")).unwrap(),
        "# Executive Summary\n\nApache 2.4.41 exposed."
    );
    assert!(matches!(report.summary, SummaryStatus::Written { .. }));
    assert!(std::fs::read_to_string(session.join("workflow.log")).unwrap().contains("phase cross-reference"));

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[2].contains("### apache 2.4.41 ###"));
}

#[tokio::test]
async fn service_outage_still_reaches_done() {
    let root = TempDir::new().unwrap();
    let llm = CannedProvider::new(vec![]);

    let report = WorkflowOrchestrator::new(config(root.path()), llm.clone())
        .with_initial_scan(Command::new(["printf", "hello\\n"]).unwrap())
        .run("10.0.0.7")
        .await
        .unwrap();

    assert_eq!(report.executed.len(), 1);
    assert_eq!(report.interpreted, 0);
    assert_eq!(report.summary, SummaryStatus::NothingToSummarize);
    assert_eq!(report.phases.last(), Some(&WorkflowPhase::Done));
}

#[tokio::test]
async fn unknown_initial_tool_is_skipped_not_fatal() {
    let root = TempDir::new().unwrap();
    let llm = CannedProvider::new(vec![]);

    let report = WorkflowOrchestrator::new(config(root.path()), llm.clone())
        .with_initial_scan(Command::new(["no-such-scanner-xyz", "10.0.0.7"]).unwrap())
        .run("10.0.0.7")
        .await
        .unwrap();

    assert!(report.executed.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert!(root.path().join("10.0.0.7/no-such-scanner-xyz.txt").exists());
    assert!(llm.prompts().is_empty());
}

#[tokio::test]
async fn summary_can_be_regenerated_from_session() {
    use triage::reporting::{ExecutiveSummarizer, ExecutiveSummary};
    use triage::session::SessionLayout;

    let root = TempDir::new().unwrap();
    let layout = SessionLayout::new(root.path(), "10.0.0.9").unwrap();
    layout.ensure().await.unwrap();
    std::fs::write(layout.summary(), "## nmap\nSummary:\n- ftp anonymous login\nRecommended steps:\n\n").unwrap();
    let llm = CannedProvider::new(vec!["# Again".into()]);

    let outcome = ExecutiveSummarizer::new(llm.as_ref(), RetryConfig::none())
        .summarize("10.0.0.9", &layout)
        .await
        .unwrap();

    assert!(matches!(outcome, ExecutiveSummary::Written { ref content, .. } if content == "# Again"));
    assert!(llm.prompts()[0].contains("ftp anonymous login"));
}
