use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use triage::cli::{self, Cli, Commands};
use triage::config;
use triage::errors::TriageError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match (cli.quiet, cli.verbose) {
        (true, 0) => "warn",
        (_, 0) => "info",
        (_, 1) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = option_env!("GIT_HASH").unwrap_or("unknown"),
        built = env!("BUILD_TIMESTAMP"),
        "triage starting"
    );

    let quiet = cli.quiet;
    let result = match cli.command {
        Commands::Run(args) => cli::run::handle_run(args, quiet).await,
        Commands::Summarize(args) => cli::summarize::handle_summarize(args, quiet).await,
        Commands::Tools(args) => cli::tools::handle_tools(args, quiet).await,
        Commands::Validate(args) => handle_validate(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            TriageError::Config(_) | TriageError::Yaml(_) => 2,
            TriageError::Authentication(_) => 4,
            TriageError::InvalidTarget(_) => 5,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}

async fn handle_validate(args: cli::commands::ValidateArgs) -> Result<(), TriageError> {
    let path = std::path::PathBuf::from(&args.config);
    let config = config::parse_config(&path).await?;
    println!("Configuration is valid: {}", args.config);
    println!("  tools: {}", config.catalog());
    Ok(())
}
