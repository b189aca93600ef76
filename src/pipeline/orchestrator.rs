use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use crate::audit::WorkflowLogger;
use crate::capture::{token_budget, BoundedOutputCapture, ExecStatus};
use crate::command::{initial_scan, Command, CommandValidator};
use crate::errors::TriageError;
use crate::exploits::ExploitCrossReferencer;
use crate::interpret::{InterpretationResult, ResponseInterpreter};
use crate::llm::LLMProvider;
use crate::reporting::{Console, ExecutiveSummarizer, ExecutiveSummary};
use crate::session::ReconSession;
use super::phase::WorkflowPhase;
use super::state::{SummaryStatus, WorkflowConfig, WorkflowReport};

/// Drives one reconnaissance run: initial scan, recommended commands level by
/// level, exploit cross-reference, executive summary.
pub struct WorkflowOrchestrator {
    config: WorkflowConfig,
    llm: Arc<dyn LLMProvider>,
    console: Console,
    initial_scan: Option<Command>,
}

impl WorkflowOrchestrator {
    pub fn new(config: WorkflowConfig, llm: Arc<dyn LLMProvider>) -> Self {
        let console = Console::new(config.quiet);
        Self { config, llm, console, initial_scan: None }
    }

    /// Replace the fixed `nmap -sC -sV -p- <target>` first step.
    pub fn with_initial_scan(mut self, command: Command) -> Self {
        self.initial_scan = Some(command);
        self
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Only failing to prepare the session directory is an error; every
    /// per-command failure is recorded in the report and the run goes on.
    pub async fn run(&self, target: &str) -> Result<WorkflowReport, TriageError> {
        let started = Instant::now();
        let mut session = ReconSession::new(&self.config.triage_root, target)?;
        session.layout().ensure().await?;

        let mut report = WorkflowReport::new(target, session.layout().dir().to_path_buf());
        let log = WorkflowLogger::new(session.layout().workflow_log());
        if let Err(e) = log.initialize(target, &report.run_id).await {
            warn!(error = %e, "Cannot write workflow log");
        }

        info!(
            target,
            run_id = %report.run_id,
            provider = self.llm.provider_name(),
            model = self.llm.model_name(),
            max_depth = self.config.max_depth,
            "Workflow started"
        );
        self.enter(WorkflowPhase::Init, &mut report, &log).await;

        self.enter(WorkflowPhase::InitialScan, &mut report, &log).await;
        let first = self.initial_scan.clone().unwrap_or_else(|| initial_scan(target));
        let mut frontier = match self.step(&mut session, first, &mut report, &log).await {
            Some(result) => result.recommended_steps,
            None => Vec::new(),
        };

        self.enter(WorkflowPhase::IterateRecommendations, &mut report, &log).await;
        for depth in 1..=self.config.max_depth {
            if frontier.is_empty() {
                break;
            }
            debug!(depth, commands = frontier.len(), "Iterating recommendation level");
            let mut next = Vec::new();
            for line in std::mem::take(&mut frontier) {
                let command = match Command::from_suggestion(&line, &self.config.catalog) {
                    Ok(command) => command,
                    Err(e) => {
                        warn!(command = %line, error = %e, "Recommended command rejected");
                        self.console.skipped(&line, &e.to_string());
                        self.log(&log, &format!("rejected {} ({})", line, e)).await;
                        report.skip(line, e.to_string());
                        continue;
                    }
                };
                if let Some(result) = self.step(&mut session, command, &mut report, &log).await {
                    // The last level's suggestions are recorded but never run.
                    if depth < self.config.max_depth {
                        next.extend(result.recommended_steps);
                    }
                }
            }
            frontier = next;
        }

        report.services = session.unique_services();
        if !report.services.is_empty() {
            self.enter(WorkflowPhase::CrossReference, &mut report, &log).await;
            let referencer = ExploitCrossReferencer::new(self.config.exploit_tool.clone())
                .with_args(self.config.exploit_args.iter().cloned())
                .with_timeout(self.config.exploit_timeout);
            match referencer.cross_reference(&report.services, &session.layout().exploits()).await {
                Ok(xref) => {
                    info!(looked_up = xref.looked_up, failed = xref.failed.len(), "Exploit cross-reference complete");
                    self.log(&log, &format!("cross-referenced {} services, {} failed", xref.looked_up, xref.failed.len())).await;
                    report.cross_reference = Some(xref);
                }
                Err(e) => {
                    warn!(error = %e, "Exploit cross-reference could not write its results");
                    self.console.warn(&format!("exploit cross-reference failed: {}", e));
                }
            }
        } else {
            info!("No services discovered, skipping exploit cross-reference");
        }

        self.enter(WorkflowPhase::Summarize, &mut report, &log).await;
        let spinner = self.console.spinner("Writing executive summary...");
        let summarized = ExecutiveSummarizer::new(self.llm.as_ref(), self.config.retry.clone())
            .summarize(target, session.layout())
            .await;
        spinner.finish();
        report.summary = match summarized {
            Ok(ExecutiveSummary::Written { path, content }) => {
                self.console.info(&format!("Executive summary written to {}", path.display()));
                SummaryStatus::Written { path, content }
            }
            Ok(ExecutiveSummary::NothingToSummarize) => {
                self.console.warn("No tool summaries recorded, nothing to summarize");
                SummaryStatus::NothingToSummarize
            }
            Err(e) => {
                warn!(error = %e, "Executive summary failed");
                self.console.warn(&format!("executive summary failed: {}", e));
                SummaryStatus::Failed(e.to_string())
            }
        };

        self.enter(WorkflowPhase::Done, &mut report, &log).await;
        report.duration = started.elapsed();
        info!(
            target,
            executed = report.executed.len(),
            skipped = report.skipped.len(),
            services = report.services.len(),
            duration_ms = report.duration.as_millis() as u64,
            "Workflow complete"
        );
        self.console.done(report.executed.len(), report.services.len(), report.duration);
        Ok(report)
    }

    /// Validate, run, and interpret one command. `Some` only for a structured result.
    async fn step(
        &self,
        session: &mut ReconSession,
        command: Command,
        report: &mut WorkflowReport,
        log: &WorkflowLogger,
    ) -> Option<InterpretationResult> {
        if session.ledger.was_executed(&command.to_string()) {
            debug!(command = %command, "Already executed, skipping");
            report.skip(command.to_string(), "already executed");
            return None;
        }

        let command = if self.config.validate_commands {
            let validator = CommandValidator::new(self.llm.as_ref(), &self.config.catalog, self.config.retry.clone())
                .with_help_timeout(self.config.help_timeout);
            let outcome = validator.validate(command).await;
            self.console.validated(&outcome);
            let command = outcome.into_command();
            if session.ledger.was_executed(&command.to_string()) {
                debug!(command = %command, "Corrected command already executed, skipping");
                report.skip(command.to_string(), "already executed");
                return None;
            }
            command
        } else {
            command
        };

        self.console.running(&command);
        let capture = BoundedOutputCapture::new(token_budget(self.llm.context_length()), self.config.command_timeout)
            .with_live_tail(self.config.live_tail && !self.console.is_quiet());
        let record = match capture.run(&command, &session.layout().tool_output(command.tool_name())).await {
            Ok(record) => record,
            Err(e) => {
                warn!(command = %command, error = %e, "Capture failed");
                self.console.skipped(&command.to_string(), &e.to_string());
                report.skip(command.to_string(), e.to_string());
                return None;
            }
        };

        if record.spawned() {
            session.ledger.record_executed(command.to_string());
            report.executed.push(command.to_string());
        }
        self.log(log, &format!("{} -> {:?} ({} tokens)", command, record.status, record.tokens_captured)).await;

        match &record.status {
            ExecStatus::Completed { .. } => {}
            ExecStatus::TimedOut => {
                self.console.warn(&format!("{} timed out, no findings", command.tool_name()));
                return None;
            }
            ExecStatus::FailedToStart { reason } => {
                self.console.skipped(&command.to_string(), reason);
                report.skip(command.to_string(), reason.clone());
                return None;
            }
        }

        let exclusions = session.ledger.exclusions();
        let interpreter = ResponseInterpreter::new(self.llm.as_ref(), &self.config.catalog, self.config.retry.clone());
        let spinner = self.console.spinner(format!("Interpreting {} output...", command.tool_name()));
        let interpretation = interpreter.interpret(&record, &exclusions, &session.layout().summary()).await;
        spinner.finish();
        self.console.interpretation(command.tool_name(), &interpretation);

        let result = interpretation.into_result()?;
        session.absorb(&result);
        report.interpreted += 1;
        Some(result)
    }

    async fn enter(&self, phase: WorkflowPhase, report: &mut WorkflowReport, log: &WorkflowLogger) {
        info!(phase = %phase, "Phase started");
        if !phase.is_terminal() {
            let definition = phase.definition();
            self.console.phase(definition.display_name, definition.description);
        }
        report.phases.push(phase);
        self.log(log, &format!("phase {}", phase)).await;
    }

    async fn log(&self, log: &WorkflowLogger, message: &str) {
        if let Err(e) = log.log_event(message).await {
            debug!(error = %e, "Failed to append workflow log");
        }
    }
}
