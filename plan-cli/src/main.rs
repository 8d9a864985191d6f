use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use plan_cli::app::{self, DataOverrides};
use plan_cli::config::AppConfig;
use plan_cli::input::ProfileDocument;
use plan_cli::{csv_loader, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Tax strategy planner.
///
/// Matches household profiles against the strategy catalog and projects
/// multi-year tax savings. Reports are printed to stdout as JSON; logs go to
/// stderr.
#[derive(Debug, Parser)]
#[command(name = "escape-plan", version)]
struct Cli {
    /// TOML file with engine policies and data defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Strategy catalog JSON. Defaults to the built-in catalog.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Tax bracket CSV (`tax_year,min_income,max_income,rate`).
    #[arg(long, global = true)]
    brackets: Option<PathBuf>,

    /// Tax year to read from the bracket file.
    #[arg(long, global = true)]
    tax_year: Option<i32>,

    /// Log level or filter directive. `RUST_LOG` wins when set.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append logs to this file as well.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the strategy stack for a profile.
    Stack {
        #[arg(long)]
        profile: PathBuf,
    },
    /// Print the tax and savings forecast for a profile.
    Forecast {
        #[arg(long)]
        profile: PathBuf,
    },
    /// Print the strategy stack and the forecast for a profile.
    Plan {
        #[arg(long)]
        profile: PathBuf,
    },
    /// Summarise every profile in a CSV file, one line per row.
    Batch {
        #[arg(long)]
        input: PathBuf,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("cannot serialize report")?;
    println!("{json}");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path).with_context(|| format!("config '{}'", path.display())),
        None => Ok(AppConfig::default()),
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(config.logging.level.as_str());
    let log_file = cli.log_file.as_deref().or(config.logging.file.as_deref());
    logging::init_logging(level, log_file)?;
    debug!(?cli, "parsed arguments");

    let engine = app::build_engine(
        &config,
        DataOverrides {
            catalog: cli.catalog.as_deref(),
            brackets: cli.brackets.as_deref(),
            tax_year: cli.tax_year,
        },
    )?;

    match &cli.command {
        Command::Stack { profile } => {
            let document = ProfileDocument::load(profile)?;
            print_json(&engine.strategy_stack(&document.profile, &document.inputs()))
        }
        Command::Forecast { profile } => {
            let document = ProfileDocument::load(profile)?;
            print_json(&engine.forecast(&document.profile, &document.inputs()))
        }
        Command::Plan { profile } => {
            let document = ProfileDocument::load(profile)?;
            print_json(&engine.plan(&document.profile, &document.inputs()))
        }
        Command::Batch { input } => {
            let entries = csv_loader::load_from_file(input)?;
            let summaries = app::run_batch(&engine, &entries);
            for summary in &summaries {
                println!("{summary}");
            }
            info!(rows = summaries.len(), "batch complete");
            Ok(())
        }
    }
}
