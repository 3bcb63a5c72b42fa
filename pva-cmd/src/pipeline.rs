//! The batch pipeline: fetch, normalize, merge, compute, render.
//!
//! Stages run one after another; each one only sees the finished output of
//! the previous stage.

use crate::config::Config;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use pva_core::{
    climate::ClimateRecord,
    generation::GenerationRecord,
    power::PowerClient,
    sentinel::ScrubbedSeries,
    unified::UnifiedRecord,
};
use pva_data::{
    export::{read_merged_csv, write_merged_csv},
    kpi::{compute_kpis, monthly_comparison, KpiSet, MonthlyComparison, ReferenceTable},
    loader::load_generation_rows,
    merge::merge_series,
    normalize::normalize_generation,
};
use pva_report::{compose_report, write_report, ReportContext, ReportInput};
use std::path::PathBuf;

/// Indicators derived from one merged series.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub series: ScrubbedSeries,
    pub kpis: KpiSet,
    pub monthly: Vec<MonthlyComparison>,
}

impl Analysis {
    /// Scrub sentinels, then compute KPIs and the monthly comparison.
    pub fn from_merged(records: &[UnifiedRecord]) -> Analysis {
        let series = ScrubbedSeries::from_unified(records);
        let kpis = compute_kpis(&series);
        let monthly = monthly_comparison(&series, &ReferenceTable::pvsol());
        Analysis {
            series,
            kpis,
            monthly,
        }
    }
}

/// Paths written by a full run, plus what was computed.
#[derive(Debug, Clone)]
pub struct AnalyzeOutcome {
    pub merged_csv: PathBuf,
    pub report: PathBuf,
    pub analysis: Analysis,
}

pub async fn fetch_climate(config: &Config) -> Result<Vec<ClimateRecord>> {
    let client = PowerClient::new(config.power.base_url.as_str(), config.power_timeout())?;
    let query = config.power_query()?;
    let records = client.fetch_daily(&query).await?;
    Ok(records)
}

pub fn load_generation(config: &Config) -> Result<Vec<GenerationRecord>> {
    let rows = load_generation_rows(&config.input.generation, &config.sheet_options())?;
    let (records, _report) = normalize_generation(&rows);
    Ok(records)
}

/// Fetch climate, load generation and join them. Nothing is written.
pub async fn build_merged(config: &Config) -> Result<Vec<UnifiedRecord>> {
    let climate = fetch_climate(config).await?;
    let generation = load_generation(config)?;
    let (merged, _report) = merge_series(&climate, &generation);
    Ok(merged)
}

/// Build the merged series and persist it as-is.
pub async fn run_merge(config: &Config) -> Result<Vec<UnifiedRecord>> {
    let merged = build_merged(config).await?;
    write_merged_csv(&config.output.merged_csv, &merged).with_context(|| {
        format!(
            "Failed to write merged file {}",
            config.output.merged_csv.display()
        )
    })?;
    Ok(merged)
}

/// Render the report for an analysis into the configured directory.
pub fn render_report(config: &Config, analysis: &Analysis, today: NaiveDate) -> Result<PathBuf> {
    let context = ReportContext {
        site_name: config.site.name.clone(),
        author: config.site.author.clone(),
        generated_on: today,
    };
    let html = compose_report(
        &context,
        ReportInput {
            kpis: &analysis.kpis,
            monthly: &analysis.monthly,
            series: &analysis.series,
            charts: &config.charts,
        },
    )?;
    let path = write_report(&config.output.report_dir, &html, &today)?;
    Ok(path)
}

/// Full run: merged file plus report.
pub async fn run_analyze(config: &Config, today: NaiveDate) -> Result<AnalyzeOutcome> {
    let merged = run_merge(config).await?;
    let analysis = Analysis::from_merged(&merged);
    info!(
        "Computed KPIs over {} days and {} months",
        analysis.kpis.days_analyzed,
        analysis.monthly.len()
    );
    let report = render_report(config, &analysis, today)?;
    Ok(AnalyzeOutcome {
        merged_csv: config.output.merged_csv.clone(),
        report,
        analysis,
    })
}

/// Report from an existing merged file, without touching the network.
pub fn run_report(config: &Config, today: NaiveDate) -> Result<(PathBuf, Analysis)> {
    let merged = read_merged_csv(&config.output.merged_csv)?;
    let analysis = Analysis::from_merged(&merged);
    let report = render_report(config, &analysis, today)?;
    Ok((report, analysis))
}
