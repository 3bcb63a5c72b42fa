//! HTML performance report.
//!
//! [`compose_report`] turns the indicators, the monthly comparison and the
//! optional chart images into one self-contained HTML page; chart images are
//! inlined. It never fails because of a chart: absent images become
//! placeholder notes.

pub mod figures;
pub mod narrative;

use askama::Template;
use chrono::NaiveDate;
use log::info;
use pva_core::{
    error::{PvaError, Result},
    sentinel::ScrubbedSeries,
};
use pva_data::kpi::{KpiSet, MonthlyComparison};
use pva_utils::{
    dates::{format_date, format_date_compact},
    numbers::{format_optional, NOT_AVAILABLE},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub use figures::{ChartImages, Figure};

/// Prefix of generated report file names.
pub const REPORT_PREFIX: &str = "performance_report";

/// Who and what the report is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub site_name: String,
    pub author: Option<String>,
    pub generated_on: NaiveDate,
}

/// Everything computed upstream that the report shows.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub kpis: &'a KpiSet,
    pub monthly: &'a [MonthlyComparison],
    pub series: &'a ScrubbedSeries,
    pub charts: &'a ChartImages,
}

#[derive(Debug)]
struct KpiLine {
    label: &'static str,
    value: String,
}

#[derive(Debug)]
struct DriverSection {
    number: usize,
    heading: &'static str,
    narrative: String,
    figure: Figure,
}

#[derive(Debug)]
struct MonthRow {
    year: i32,
    month: String,
    real_kwh: String,
    reference_kwh: String,
    compliance_pct: String,
}

#[derive(Debug, Template)]
#[template(path = "report.html")]
struct ReportTemplate {
    site_name: String,
    author: String,
    period: String,
    generated_on: String,
    kpis: Vec<KpiLine>,
    summary: String,
    drivers: Vec<DriverSection>,
    table_number: usize,
    table_intro: String,
    months: Vec<MonthRow>,
    closing_number: usize,
    conclusions: Vec<&'static str>,
    recommendations: Vec<&'static str>,
}

fn period_label(kpis: &KpiSet) -> String {
    match (kpis.period_start, kpis.period_end) {
        (Some(start), Some(end)) => format!("{} to {}", format_date(&start), format_date(&end)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn kpi_lines(kpis: &KpiSet) -> Vec<KpiLine> {
    vec![
        KpiLine {
            label: "Days analyzed",
            value: kpis.days_analyzed.to_string(),
        },
        KpiLine {
            label: "Total generation (kWh)",
            value: format_optional(kpis.total_generation_kwh, 0),
        },
        KpiLine {
            label: "Mean daily generation (kWh/day)",
            value: format_optional(kpis.mean_generation_kwh, 1),
        },
        KpiLine {
            label: "Mean irradiance (kWh/m²/day)",
            value: format_optional(kpis.mean_irradiance, 2),
        },
        KpiLine {
            label: "Mean cloud cover (%)",
            value: format_optional(kpis.mean_cloud_fraction, 1),
        },
        KpiLine {
            label: "Mean temperature (°C) [max / min]",
            value: format!(
                "{} / {}",
                format_optional(kpis.mean_temp_max, 1),
                format_optional(kpis.mean_temp_min, 1)
            ),
        },
        KpiLine {
            label: "Mean simplified PR (kWh per kWh/m²)",
            value: format_optional(kpis.mean_performance_ratio, 2),
        },
    ]
}

fn month_rows(monthly: &[MonthlyComparison]) -> Vec<MonthRow> {
    monthly
        .iter()
        .map(|m| MonthRow {
            year: m.year,
            month: format!("{:02}", m.month),
            real_kwh: format_optional(m.real_kwh, 0),
            reference_kwh: format_optional(m.reference_kwh, 0),
            compliance_pct: format_optional(m.compliance_pct, 1),
        })
        .collect()
}

/// Render the report page.
pub fn compose_report(context: &ReportContext, input: ReportInput<'_>) -> Result<String> {
    let ReportInput {
        kpis,
        monthly,
        series,
        charts,
    } = input;

    let drivers = vec![
        DriverSection {
            number: 2,
            heading: "Solar irradiance vs generation",
            narrative: narrative::irradiance(kpis, series),
            figure: Figure::resolve(1, "Irradiance vs generation", charts.irradiance.as_deref()),
        },
        DriverSection {
            number: 3,
            heading: "Daily cloud cover",
            narrative: narrative::cloud_cover(kpis, series),
            figure: Figure::resolve(2, "Daily cloud cover", charts.cloud_cover.as_deref()),
        },
        DriverSection {
            number: 4,
            heading: "Daily precipitation",
            narrative: narrative::precipitation(kpis),
            figure: Figure::resolve(3, "Daily precipitation", charts.precipitation.as_deref()),
        },
        DriverSection {
            number: 5,
            heading: "Daily temperatures",
            narrative: narrative::temperature(kpis),
            figure: Figure::resolve(4, "Daily temperatures", charts.temperature.as_deref()),
        },
    ];

    let template = ReportTemplate {
        site_name: context.site_name.clone(),
        author: context.author.clone().unwrap_or_default(),
        period: period_label(kpis),
        generated_on: format_date(&context.generated_on),
        kpis: kpi_lines(kpis),
        summary: narrative::summary(kpis, monthly),
        table_number: drivers.len() + 2,
        drivers,
        table_intro: narrative::table_intro(monthly),
        months: month_rows(monthly),
        closing_number: 7,
        conclusions: narrative::CONCLUSIONS.to_vec(),
        recommendations: narrative::RECOMMENDATIONS.to_vec(),
    };

    template.render().map_err(|e| PvaError::Render(e.to_string()))
}

/// `performance_report_YYYYMMDD.html`
pub fn report_file_name(date: &NaiveDate) -> String {
    format!("{}_{}.html", REPORT_PREFIX, format_date_compact(date))
}

/// Write a rendered report into `dir`, creating it if needed.
pub fn write_report(dir: &Path, html: &str, date: &NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(date));
    fs::write(&path, html)?;
    info!("Report written to {}", path.display());
    Ok(path)
}
