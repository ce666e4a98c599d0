//! qualcode CLI
//!
//! Main entry point for the qualcode command-line tool: LLM-assisted
//! qualitative coding of interview transcripts with category-colored
//! highlighting.

mod commands;
mod html;

use clap::{Parser, Subcommand};
use commands::{CodeCommand, LegendCommand};
use qualcode_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// qualcode - LLM-assisted qualitative coding of interview transcripts
#[derive(Parser, Debug)]
#[command(name = "qualcode")]
#[command(about = "Code interview transcripts into a fixed taxonomy with colored highlights", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "QUALCODE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (azure, ollama)
    #[arg(short, long, global = true, env = "QUALCODE_PROVIDER")]
    provider: Option<String>,

    /// Model identifier (Azure deployment name, Ollama model tag)
    #[arg(short, long, global = true, env = "QUALCODE_MODEL")]
    model: Option<String>,

    /// Custom provider endpoint (Ollama only)
    #[arg(long, global = true, env = "QUALCODE_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Code a transcript and write the highlighted output
    Code(CodeCommand),

    /// Print the coding legend (categories and colors)
    Legend(LegendCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("qualcode starting");
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Code(_) => "code",
        Commands::Legend(_) => "legend",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Code(cmd) => cmd.execute(&config, cli.endpoint.as_deref()).await,
        Commands::Legend(cmd) => cmd.execute(),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
