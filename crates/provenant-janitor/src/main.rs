//! Provenant Janitor CLI
//!
//! Sweeps a graph database for orphaned and inconsistent elements, once or
//! on a schedule.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use provenant_janitor::{Janitor, JanitorConfig, JanitorWorker, ServiceConfig};
use provenant_store::SqliteStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Reconciliation sweep for a Provenant graph database
#[derive(Debug, Parser)]
#[command(name = "provenant-janitor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PROVENANT_JANITOR_CONFIG")]
    config: Option<PathBuf>,

    /// Database file (overrides the config file)
    #[arg(short, long, env = "PROVENANT_DB")]
    database: Option<PathBuf>,

    /// Janitor preset used when no config file is given
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    preset: Preset,

    /// Run a single sweep, print the report as JSON and exit
    #[arg(long)]
    once: bool,
}

/// Janitor configuration presets
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// Hourly sweeps
    Default,
    /// Frequent sweeps with large samples
    Aggressive,
    /// Infrequent orphan-only sweeps
    Lenient,
}

impl From<Preset> for JanitorConfig {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Default => JanitorConfig::default(),
            Preset::Aggressive => JanitorConfig::aggressive(),
            Preset::Lenient => JanitorConfig::lenient(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --once output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServiceConfig {
            janitor: cli.preset.into(),
            ..Default::default()
        },
    };
    if let Some(database) = cli.database {
        config.store.path = database;
    }
    config.validate().context("invalid configuration")?;

    let span = tracing::info_span!("janitor", db = %config.store.path.display());
    let store = SqliteStore::with_config(config.store.clone())
        .with_context(|| format!("opening {}", config.store.path.display()))?
        .with_span(span.clone());

    if cli.once {
        let mut janitor = Janitor::new(config.janitor).with_span(span);
        let report = janitor.sweep(&store)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut worker = JanitorWorker::new(config.janitor).with_span(span);
    worker.run(store).await?;
    Ok(())
}
