//! Reportal CLI — submit a research topic, watch the queue, and export the
//! finished report.

mod commands;
mod render;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Reportal: research reports from a single topic
#[derive(Parser, Debug)]
#[command(name = "reportal", version, about, long_about = None)]
struct Cli {
    /// Research topic to submit
    topic: Option<String>,

    /// Export format for the finished report
    #[arg(long, value_enum, default_value = "pdf")]
    format: ExportFormat,

    /// Output directory for exported files (defaults to configuration)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Print the report without exporting a file
    #[arg(long)]
    no_export: bool,

    /// Workspace directory for configuration lookup
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress progress output and the on-screen report
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Probe the backend health endpoint
    Health,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportFormat {
    Pdf,
    Html,
    Text,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));
    tracing_subscriber::registry().with(stderr_layer).init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let config = reportal_core::config::load_config(Some(&workspace), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {e}"))?;
    config.validate()?;

    if let Some(command) = cli.command {
        return match command {
            Commands::Health => commands::health(&config).await,
        };
    }

    let Some(topic) = cli.topic else {
        anyhow::bail!("Provide a research topic, or a subcommand (see --help)");
    };

    commands::research(commands::ResearchOptions {
        config,
        topic,
        format: cli.format,
        out: cli.out,
        no_export: cli.no_export,
        quiet: cli.quiet,
    })
    .await
}
