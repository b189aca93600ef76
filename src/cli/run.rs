use std::path::PathBuf;
use std::time::Duration;
use console::style;
use tracing::info;
use crate::cli::commands::RunArgs;
use crate::errors::TriageError;
use crate::pipeline::{SummaryStatus, WorkflowOrchestrator};
use crate::session::validate_target;
use crate::utils::formatting::format_duration;

pub async fn handle_run(args: RunArgs, quiet: bool) -> Result<(), TriageError> {
    validate_target(&args.target)?;
    info!(target = %args.target, "Starting reconnaissance");

    let file_config = super::load_config(args.config.as_deref()).await?;
    let llm = super::build_provider(&args.llm, &file_config)?;

    let mut config = file_config.workflow_config();
    config.quiet = quiet;
    if let Some(root) = &args.triage_root {
        config.triage_root = PathBuf::from(root);
    }
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    if args.no_validate {
        config.validate_commands = false;
    }
    if let Some(secs) = args.timeout_secs {
        if secs == 0 {
            return Err(TriageError::Config("--timeout-secs must be greater than zero".into()));
        }
        config.command_timeout = Duration::from_secs(secs);
    }
    if config.catalog.is_empty() {
        return Err(TriageError::Config("tool allow-list is empty".into()));
    }

    let report = WorkflowOrchestrator::new(config, llm).run(&args.target).await?;

    info!(
        executed = report.executed.len(),
        skipped = report.skipped.len(),
        services = report.services.len(),
        duration_ms = report.duration.as_millis() as u64,
        "Reconnaissance completed"
    );

    if !quiet {
        println!();
        println!("{} {}", style("Session:").white().bold(), report.session_dir.display());
        println!(
            "{} {} executed, {} skipped, {} interpreted in {}",
            style("Commands:").white().bold(),
            report.executed.len(),
            report.skipped.len(),
            report.interpreted,
            format_duration(report.duration),
        );
        if !report.services.is_empty() {
            let services: Vec<&str> = report.services.iter().map(String::as_str).collect();
            println!("{} {}", style("Services:").white().bold(), services.join(", "));
        }
        match &report.summary {
            SummaryStatus::Written { path, content } => {
                println!("\n{}\n", content);
                println!("{} {}", style("Executive summary:").white().bold(), path.display())
            }
            SummaryStatus::NothingToSummarize => {
                println!("{} none (no tool produced findings)", style("Executive summary:").white().bold())
            }
            SummaryStatus::Failed(reason) => println!(
                "{} {}",
                style("Executive summary failed:").red().bold(),
                reason
            ),
        }
    }
    Ok(())
}
