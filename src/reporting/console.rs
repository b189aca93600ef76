use std::io::Write;
use std::time::Duration;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use crate::command::{Command, ValidationOutcome};
use crate::interpret::Interpretation;
use crate::utils::formatting::{count_noun, format_duration};

/// Lines echoed before the live tail collapses into a counter.
pub const LIVE_TAIL_LINES: usize = 9;

/// Echoes the first lines of a running tool, then a hidden-lines counter.
pub struct LiveTail {
    enabled: bool,
    shown: usize,
    hidden: usize,
}

impl LiveTail {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, shown: 0, hidden: 0 }
    }

    pub fn line(&mut self, line: &str) {
        if !self.enabled {
            return;
        }
        if self.shown < LIVE_TAIL_LINES {
            self.shown += 1;
            println!("    {}", style(line).dim());
            return;
        }
        if self.hidden == 0 {
            println!("    {}", style("Output truncated...").dim().italic());
        }
        self.hidden += 1;
        print!("\r    {}", style(format!("[{} more lines hidden]", self.hidden)).dim());
        let _ = std::io::stdout().flush();
    }

    pub fn truncated(&mut self) {
        if !self.enabled {
            return;
        }
        if self.hidden > 0 {
            println!();
            self.hidden = 0;
        }
        println!("    {}", style("[capture stopped: token budget reached]").yellow());
    }

    pub fn finish(&mut self) {
        if self.enabled && self.hidden > 0 {
            println!();
        }
    }
}

/// Human-facing progress output. Every method is a no-op when quiet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn phase(&self, name: &str, description: &str) {
        if self.quiet { return; }
        println!(
            "\n{} {} {}",
            style("---").cyan().bold(),
            style(name).cyan().bold(),
            style("---").cyan().bold(),
        );
        println!("    {}", style(description).dim());
    }

    pub fn running(&self, command: &Command) {
        if self.quiet { return; }
        println!("{} {}", style("▶").green().bold(), style(command).white().bold());
    }

    pub fn validated(&self, outcome: &ValidationOutcome) {
        if self.quiet { return; }
        match outcome {
            ValidationOutcome::Corrected { original, corrected } => println!(
                "  {} corrected {} -> {}",
                style("✎").yellow(),
                style(original).dim(),
                style(corrected).yellow(),
            ),
            ValidationOutcome::Unchanged(_) => {}
            ValidationOutcome::Skipped { reason, .. } => println!(
                "  {} validation skipped ({})",
                style("·").dim(),
                style(reason).dim(),
            ),
        }
    }

    pub fn skipped(&self, command: &str, reason: &str) {
        if self.quiet { return; }
        println!(
            "  {} skipped {} ({})",
            style("✗").red(),
            style(command).red(),
            style(reason).red().dim(),
        );
    }

    pub fn interpretation(&self, tool: &str, outcome: &Interpretation) {
        if self.quiet { return; }
        match outcome {
            Interpretation::Findings { result, repaired } => {
                let note = if *repaired { " (repaired)" } else { "" };
                println!("  {} {} interpreted{}", style("✓").green(), style(tool).green(), note);
                for line in result.summary.lines().filter(|l| !l.trim().is_empty()) {
                    println!("    {}", line);
                }
                if !result.recommended_steps.is_empty() {
                    println!("  {}", style("Recommended:").white().bold());
                    for step in &result.recommended_steps {
                        println!("    {} {}", style("→").cyan(), step);
                    }
                }
                if !result.services_found.is_empty() {
                    println!(
                        "  {} {}",
                        style("Services:").white().bold(),
                        result.services_found.join(", "),
                    );
                }
            }
            Interpretation::Unusable => println!(
                "  {} {} output not usable for analysis",
                style("·").dim(),
                style(tool).dim(),
            ),
            Interpretation::Failed { reason } => println!(
                "  {} {} interpretation failed ({})",
                style("✗").red(),
                style(tool).red(),
                style(reason).red().dim(),
            ),
        }
    }

    pub fn info(&self, msg: &str) {
        if self.quiet { return; }
        println!("  {}", msg);
    }

    pub fn warn(&self, msg: &str) {
        if self.quiet { return; }
        println!("  {} {}", style("⚠").yellow(), style(msg).yellow());
    }

    pub fn done(&self, executed: usize, services: usize, elapsed: Duration) {
        if self.quiet { return; }
        println!(
            "\n{} Done: {}, {} in {}",
            style("✔").green().bold(),
            count_noun(executed, "command"),
            count_noun(services, "service"),
            format_duration(elapsed),
        );
    }

    /// Spinner shown while waiting on the interpretation service.
    pub fn spinner(&self, msg: impl Into<String>) -> Spinner {
        if self.quiet {
            return Spinner { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(msg.into());
        bar.enable_steady_tick(Duration::from_millis(120));
        Spinner { bar: Some(bar) }
    }
}

/// Cleared on drop so an early return never leaves it spinning.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    pub fn finish(mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
