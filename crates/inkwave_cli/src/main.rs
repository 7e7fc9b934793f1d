//! Inkwave CLI
//!
//! Replays recorded interaction scenarios against a headless document and
//! reports whether the ripple lifecycle matched the scenario's assertions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inkwave_ink::InkConfig;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod report;
mod runner;
mod scenario;

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "inkwave")]
#[command(author, version, about = "Headless ripple interaction replay", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario and check its assertions
    Replay {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Watcher options (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Force touch input mode
        #[arg(long, conflicts_with = "no_touch")]
        touch: bool,

        /// Force pointer and keyboard input mode
        #[arg(long)]
        no_touch: bool,

        /// Also write the JSON report to this relative path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Validate a config file and print the resolved options
    Config {
        /// Config TOML file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Replay {
            scenario,
            config,
            touch,
            no_touch,
            report,
        } => {
            let config = load_config(config.as_deref())?;
            let config = match (touch, no_touch) {
                (true, _) => config.touch_mode(true),
                (_, true) => config.touch_mode(false),
                _ => config,
            };
            let passed = cmd_replay(&scenario, config, report.as_deref())?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Config { path } => cmd_config(&path),
    }
}

fn load_config(path: Option<&Path>) -> Result<InkConfig> {
    match path {
        Some(path) => InkConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(InkConfig::default()),
    }
}

fn cmd_replay(path: &Path, config: InkConfig, report_path: Option<&Path>) -> Result<bool> {
    let scenario = Scenario::from_path(path)?;
    let mut report = runner::replay(&scenario, config)?;
    if let Some(stem) = path.file_stem() {
        report = report.with_scenario(stem.to_string_lossy());
    }

    report.write_to_writer(&mut std::io::stdout().lock())?;
    if let Some(out) = report_path {
        report.save(out)?;
        info!("Report written to {}", out.display());
    }

    if let (Some(index), Some(message)) = (report.failed_step_index, &report.message) {
        eprintln!("step {index} failed: {message}");
    }
    Ok(report.is_passed())
}

fn cmd_config(path: &Path) -> Result<()> {
    let config = load_config(Some(path))?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
