//! Testdeck CLI - Main Entry Point
//!
//! Command-line interface for inspecting scenario documents, checking them
//! for structural problems, building issue deep links, and recording
//! testing notes locally.

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{issue, note, scenario};

/// Testdeck CLI - QA Scenario Harness
#[derive(Parser)]
#[command(name = "testdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect scenario documents
    #[command(subcommand)]
    Scenario(scenario::ScenarioCommands),

    /// Build an issue-tracker deep link from an observation
    Issue(issue::IssueArgs),

    /// Record and list testing notes
    #[command(subcommand)]
    Note(note::NoteCommands),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Scenario(cmd) => scenario::execute(cmd, cli.format)?,
        Commands::Issue(args) => issue::execute(args)?,
        Commands::Note(cmd) => note::execute(cmd, cli.format).await?,
        Commands::Version => {
            println!("Testdeck CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("QA scenario harness for markdown-defined test plans");
        }
    }

    Ok(())
}
