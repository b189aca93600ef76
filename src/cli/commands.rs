use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(name = "triage", version, about = "LLM-guided reconnaissance: run scanners, interpret output, follow recommendations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the reconnaissance workflow against a target
    Run(RunArgs),
    /// Regenerate the executive summary for an existing session
    Summarize(SummarizeArgs),
    /// Print the effective tool allow-list
    Tools(ToolsArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Interpretation service selection, shared by every subcommand that calls it.
#[derive(Args, Clone, Default)]
pub struct LlmArgs {
    /// LLM provider: anthropic, openai, local, openai_compatible
    #[arg(long)]
    pub provider: Option<String>,

    /// LLM model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// LLM API key (or use env vars)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Endpoint for local or OpenAI-compatible providers
    #[arg(long)]
    pub base_url: Option<String>,

    /// Context window of the model, in tokens
    #[arg(long)]
    pub context_length: Option<usize>,
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Target host (IP address or hostname)
    pub target: String,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding one session directory per target
    #[arg(long)]
    pub triage_root: Option<String>,

    #[command(flatten)]
    pub llm: LlmArgs,

    /// Levels of recommended commands to follow after the initial scan
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Run suggested commands without checking them against --help
    #[arg(long)]
    pub no_validate: bool,

    /// Wall-clock bound on each tool run, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Args, Clone)]
pub struct SummarizeArgs {
    /// Target whose session directory to summarize
    pub target: String,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding one session directory per target
    #[arg(long)]
    pub triage_root: Option<String>,

    #[command(flatten)]
    pub llm: LlmArgs,
}

#[derive(Args, Clone)]
pub struct ToolsArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
