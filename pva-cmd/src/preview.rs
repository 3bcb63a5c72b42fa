//! Console previews of the pipeline output.

use pva_core::unified::UnifiedRecord;
use pva_data::kpi::{KpiSet, MonthlyComparison};
use pva_utils::{
    dates::format_date,
    numbers::{format_optional, NOT_AVAILABLE},
};
use tabled::{settings::Style, Table, Tabled};

/// Rows shown by the merged-series preview.
pub const PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone, Tabled)]
pub struct MonthlyRow {
    #[tabled(rename = "Year")]
    pub year: i32,
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Real (kWh)")]
    pub real_kwh: String,
    #[tabled(rename = "PV*SOL (kWh)")]
    pub reference_kwh: String,
    #[tabled(rename = "Compliance (%)")]
    pub compliance_pct: String,
}

impl From<&MonthlyComparison> for MonthlyRow {
    fn from(m: &MonthlyComparison) -> Self {
        MonthlyRow {
            year: m.year,
            month: format!("{:02}", m.month),
            real_kwh: format_optional(m.real_kwh, 0),
            reference_kwh: format_optional(m.reference_kwh, 0),
            compliance_pct: format_optional(m.compliance_pct, 1),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct MergedRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Irradiance (kWh/m²)")]
    pub irradiance: String,
    #[tabled(rename = "Generation (kWh)")]
    pub generation: String,
    #[tabled(rename = "Cloud (%)")]
    pub cloud: String,
    #[tabled(rename = "Tmax (°C)")]
    pub temp_max: String,
    #[tabled(rename = "Tmin (°C)")]
    pub temp_min: String,
}

impl From<&UnifiedRecord> for MergedRow {
    fn from(r: &UnifiedRecord) -> Self {
        MergedRow {
            date: format_date(&r.date),
            irradiance: format_optional(r.solar_irradiance, 2),
            generation: format_optional(r.generation_kwh, 1),
            cloud: format_optional(r.cloud_fraction, 1),
            temp_max: format_optional(r.temp_max, 1),
            temp_min: format_optional(r.temp_min, 1),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct KpiRow {
    #[tabled(rename = "Indicator")]
    pub indicator: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

fn kpi_row(indicator: &'static str, value: String) -> KpiRow {
    KpiRow { indicator, value }
}

pub fn kpi_rows(kpis: &KpiSet) -> Vec<KpiRow> {
    let period = match (kpis.period_start, kpis.period_end) {
        (Some(start), Some(end)) => format!("{} .. {}", format_date(&start), format_date(&end)),
        _ => NOT_AVAILABLE.to_string(),
    };
    vec![
        kpi_row("Period", period),
        kpi_row("Days analyzed", kpis.days_analyzed.to_string()),
        kpi_row(
            "Total generation (kWh)",
            format_optional(kpis.total_generation_kwh, 0),
        ),
        kpi_row(
            "Mean generation (kWh/day)",
            format_optional(kpis.mean_generation_kwh, 1),
        ),
        kpi_row(
            "Mean irradiance (kWh/m²/day)",
            format_optional(kpis.mean_irradiance, 2),
        ),
        kpi_row(
            "Mean cloud cover (%)",
            format_optional(kpis.mean_cloud_fraction, 1),
        ),
        kpi_row("Mean Tmax (°C)", format_optional(kpis.mean_temp_max, 1)),
        kpi_row("Mean Tmin (°C)", format_optional(kpis.mean_temp_min, 1)),
        kpi_row(
            "Mean simplified PR",
            format_optional(kpis.mean_performance_ratio, 2),
        ),
        kpi_row(
            "Total precipitation (mm)",
            format_optional(kpis.total_precipitation_mm, 1),
        ),
    ]
}

pub fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(rows).with(Style::markdown()).to_string()
}

pub fn print_kpis(kpis: &KpiSet) {
    println!("\nKey indicators\n");
    println!("{}\n", render_table(kpi_rows(kpis)));
}

pub fn print_monthly(monthly: &[MonthlyComparison]) {
    let rows: Vec<MonthlyRow> = monthly.iter().map(MonthlyRow::from).collect();
    println!("\nReal vs PV*SOL estimate\n");
    println!("{}\n", render_table(rows));
}

pub fn print_merged_head(records: &[UnifiedRecord]) {
    let rows: Vec<MergedRow> = records
        .iter()
        .take(PREVIEW_ROWS)
        .map(MergedRow::from)
        .collect();
    println!(
        "\nMerged series ({} days, first {} shown)\n",
        records.len(),
        rows.len()
    );
    println!("{}\n", render_table(rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_row_formatting() {
        let row = MonthlyRow::from(&MonthlyComparison {
            year: 2024,
            month: 3,
            real_kwh: Some(15512.4),
            reference_kwh: None,
            compliance_pct: None,
        });
        assert_eq!(row.month, "03");
        assert_eq!(row.real_kwh, "15,512");
        assert_eq!(row.reference_kwh, "n/a");
    }

    #[test]
    fn test_render_markdown_table() {
        let rows = vec![MonthlyRow {
            year: 2024,
            month: "05".to_string(),
            real_kwh: "19,231".to_string(),
            reference_kwh: "19,231".to_string(),
            compliance_pct: "100.0".to_string(),
        }];
        let table = render_table(rows);
        assert!(table.contains("| Year"));
        assert!(table.contains("100.0"));
        assert_eq!(render_table(Vec::<MonthlyRow>::new()), "(no rows)");
    }

    #[test]
    fn test_kpi_rows_show_undefined() {
        let rows = kpi_rows(&KpiSet::default());
        assert_eq!(rows[0].value, "n/a");
        assert_eq!(rows[2].value, "n/a");
    }
}
