use std::path::PathBuf;
use console::style;
use tracing::info;
use crate::cli::commands::SummarizeArgs;
use crate::errors::TriageError;
use crate::reporting::{ExecutiveSummarizer, ExecutiveSummary};
use crate::session::SessionLayout;

pub async fn handle_summarize(args: SummarizeArgs, quiet: bool) -> Result<(), TriageError> {
    let file_config = super::load_config(args.config.as_deref()).await?;
    let workflow = file_config.workflow_config();
    let root = args.triage_root.map(PathBuf::from).unwrap_or(workflow.triage_root);

    let layout = SessionLayout::new(&root, &args.target)?;
    if !layout.dir().is_dir() {
        return Err(TriageError::InvalidTarget(format!(
            "no session directory for {} under {}",
            args.target,
            root.display()
        )));
    }

    let llm = super::build_provider(&args.llm, &file_config)?;
    let summarizer = ExecutiveSummarizer::new(llm.as_ref(), workflow.retry);
    match summarizer.summarize(&args.target, &layout).await? {
        ExecutiveSummary::Written { path, content } => {
            info!(path = %path.display(), "Executive summary regenerated");
            if !quiet {
                println!("{}\n", content);
                println!("{} {}", style("Written to").green(), path.display());
            }
        }
        ExecutiveSummary::NothingToSummarize => {
            if !quiet {
                println!("{} {} has no summary.md yet", style("⚠").yellow(), layout.dir().display());
            }
        }
    }
    Ok(())
}
