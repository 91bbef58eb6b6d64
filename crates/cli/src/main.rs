//! GEMS Agent CLI
//!
//! Main entry point for the gems command-line tool.
//! Runs the HTTP API, answers questions from the terminal and checks
//! backend availability.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, CheckCommand, ServeCommand};
use gems_core::{config::AppConfig, logging};
use std::path::PathBuf;

/// GEMS Agent - question answering over the GEMS knowledge base
#[derive(Parser, Debug)]
#[command(name = "gems")]
#[command(about = "Question answering over the GEMS knowledge base", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "GEMS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output (any non-falsey NO_COLOR value counts)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeCommand),

    /// Ask a question, or start an interactive session
    Ask(AskCommand),

    /// Probe every generation tier and the retrieval corpus
    Check(CheckCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env before clap reads env-backed flags
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref())?.with_overrides(
        cli.log_level,
        cli.verbose,
        cli.no_color,
        cli.json_logs,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.json_logs)?;

    tracing::info!("GEMS Agent CLI starting");
    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {:?}", path);
    }
    tracing::debug!("Project: {}", config.project_id);
    tracing::debug!("Location: {}", config.location);
    tracing::debug!("Corpus: {}", config.rag_corpus_id);

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
        Commands::Check(_) => "check",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await.map_err(Into::into),
        Commands::Check(cmd) => cmd.execute(&config).await.map_err(Into::into),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_env_values() {
        std::env::set_var("NO_COLOR", "1");
        let cli = Cli::try_parse_from(["gems", "check"]).unwrap();
        assert!(cli.no_color);

        std::env::set_var("NO_COLOR", "0");
        let cli = Cli::try_parse_from(["gems", "check"]).unwrap();
        assert!(!cli.no_color);

        std::env::remove_var("NO_COLOR");
        let cli = Cli::try_parse_from(["gems", "--no-color", "check"]).unwrap();
        assert!(cli.no_color);
        assert!(matches!(cli.command, Commands::Check(_)));
    }
}
