//! Command implementations for the PVA CLI.
//!
//! Provides subcommands to merge NASA POWER climate data with a plant's
//! meter export and to report its performance against the PV*SOL estimate.

use chrono::Local;
use clap::{Args, Subcommand};
use log::info;
use std::path::PathBuf;

pub mod config;
pub mod pipeline;
pub mod preview;

use config::{Config, Overrides};

/// Options shared by the commands that build the merged series.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to a TOML configuration file (built-in defaults if omitted)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// First day of the analysis period (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Last day of the analysis period (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Meter export with daily energy in Wh (xlsx, xls, ods or csv)
    #[arg(short = 'g', long)]
    pub generation: Option<PathBuf>,

    /// Output path for the merged CSV
    #[arg(short = 'm', long)]
    pub merged_csv: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch, merge, compute KPIs and write the merged CSV and the report
    Analyze {
        #[command(flatten)]
        run: RunArgs,

        /// Directory for the generated report
        #[arg(short = 'o', long)]
        report_dir: Option<PathBuf>,
    },

    /// Fetch and merge only; writes the merged CSV
    Merge {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Build the report from an existing merged CSV
    Report {
        /// Path to a TOML configuration file (built-in defaults if omitted)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Merged CSV to read
        #[arg(short = 'm', long)]
        merged_csv: Option<PathBuf>,

        /// Directory for the generated report
        #[arg(short = 'o', long)]
        report_dir: Option<PathBuf>,
    },
}

fn resolve(run: RunArgs, report_dir: Option<PathBuf>) -> anyhow::Result<Config> {
    let overrides = Overrides {
        start: run.start,
        end: run.end,
        generation: run.generation,
        merged_csv: run.merged_csv,
        report_dir,
    };
    Config::resolve(run.config.as_deref(), &overrides)
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    match command {
        Command::Analyze { run, report_dir } => {
            let config = resolve(run, report_dir)?;
            let outcome = pipeline::run_analyze(&config, today).await?;
            preview::print_kpis(&outcome.analysis.kpis);
            preview::print_monthly(&outcome.analysis.monthly);
            info!("Merged data: {}", outcome.merged_csv.display());
            info!("Report: {}", outcome.report.display());
            Ok(())
        }
        Command::Merge { run } => {
            let config = resolve(run, None)?;
            let merged = pipeline::run_merge(&config).await?;
            preview::print_merged_head(&merged);
            info!("Merged data: {}", config.output.merged_csv.display());
            Ok(())
        }
        Command::Report {
            config,
            merged_csv,
            report_dir,
        } => {
            let overrides = Overrides {
                merged_csv,
                report_dir,
                ..Default::default()
            };
            let config = Config::resolve(config.as_deref(), &overrides)?;
            let (report, analysis) = pipeline::run_report(&config, today)?;
            preview::print_kpis(&analysis.kpis);
            preview::print_monthly(&analysis.monthly);
            info!("Report: {}", report.display());
            Ok(())
        }
    }
}
