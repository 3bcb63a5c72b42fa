//! Summary indicators and the monthly real-vs-reference comparison.
//!
//! Everything here takes a [`ScrubbedSeries`], so no sentinel can reach the
//! arithmetic. Aggregates over nothing are `None`, never zero.

use chrono::{Datelike, NaiveDate};
use log::debug;
use pva_core::{date_range::DateRange, sentinel::ScrubbedSeries, unified::UnifiedRecord};
use std::collections::BTreeMap;

/// Daily precipitation at or above this many millimetres counts as a heavy
/// rain event.
pub const HEAVY_RAIN_MM: f64 = 10.0;

/// Monthly generation (kWh) modeled for the plant with PV*SOL, by month
/// number. Repeats every year.
pub const PVSOL_REFERENCE: [(u32, f64); 12] = [
    (1, 18414.0),
    (2, 16898.0),
    (3, 18250.0),
    (4, 17883.0),
    (5, 19231.0),
    (6, 18993.0),
    (7, 19530.0),
    (8, 19060.0),
    (9, 16886.0),
    (10, 16884.0),
    (11, 16753.0),
    (12, 17217.0),
];

/// Month number to reference kWh lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceTable<'a> {
    entries: &'a [(u32, f64)],
}

impl ReferenceTable<'static> {
    pub const fn pvsol() -> ReferenceTable<'static> {
        ReferenceTable {
            entries: &PVSOL_REFERENCE,
        }
    }
}

impl<'a> ReferenceTable<'a> {
    pub const fn new(entries: &'a [(u32, f64)]) -> ReferenceTable<'a> {
        ReferenceTable { entries }
    }

    pub fn get(&self, month: u32) -> Option<f64> {
        self.entries
            .iter()
            .find(|(m, _)| *m == month)
            .map(|(_, kwh)| *kwh)
    }
}

impl Default for ReferenceTable<'static> {
    fn default() -> Self {
        ReferenceTable::pvsol()
    }
}

/// Scalar indicators of one analyzed period.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KpiSet {
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    /// Jointly observed days in the series.
    pub days_analyzed: usize,
    /// Calendar days between first and last analyzed day, inclusive.
    pub calendar_days: usize,
    pub total_generation_kwh: Option<f64>,
    pub mean_generation_kwh: Option<f64>,
    pub mean_irradiance: Option<f64>,
    pub mean_cloud_fraction: Option<f64>,
    pub mean_temp_max: Option<f64>,
    pub mean_temp_min: Option<f64>,
    pub mean_performance_ratio: Option<f64>,
    pub total_precipitation_mm: Option<f64>,
    /// `None` when the series has no precipitation values at all.
    pub heavy_rain_days: Option<usize>,
}

/// Observed against modeled generation for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyComparison {
    pub year: i32,
    pub month: u32,
    pub real_kwh: Option<f64>,
    pub reference_kwh: Option<f64>,
    pub compliance_pct: Option<f64>,
}

fn sum(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum())
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    sum(values).map(|total| total / values.len() as f64)
}

/// Generation over irradiance for one day.
///
/// `None` when either value is missing, irradiance is zero, or the quotient
/// is not finite.
pub fn performance_ratio(record: &UnifiedRecord) -> Option<f64> {
    let generation = record.generation_kwh?;
    let irradiance = record.solar_irradiance?;
    if irradiance == 0.0 {
        return None;
    }
    Some(generation / irradiance).filter(|ratio| ratio.is_finite())
}

/// Compute the scalar indicators of a scrubbed series.
pub fn compute_kpis(series: &ScrubbedSeries) -> KpiSet {
    let period = series.period();
    let generation = series.values(|r| r.generation_kwh);
    let precipitation = series.values(|r| r.precipitation);
    let ratios = series.values(performance_ratio);

    let kpis = KpiSet {
        period_start: period.map(|(start, _)| start),
        period_end: period.map(|(_, end)| end),
        days_analyzed: series.len(),
        calendar_days: period.map(|(start, end)| DateRange(start, end).days()).unwrap_or(0),
        total_generation_kwh: sum(&generation),
        mean_generation_kwh: mean(&generation),
        mean_irradiance: mean(&series.values(|r| r.solar_irradiance)),
        mean_cloud_fraction: mean(&series.values(|r| r.cloud_fraction)),
        mean_temp_max: mean(&series.values(|r| r.temp_max)),
        mean_temp_min: mean(&series.values(|r| r.temp_min)),
        mean_performance_ratio: mean(&ratios),
        total_precipitation_mm: sum(&precipitation),
        heavy_rain_days: if precipitation.is_empty() {
            None
        } else {
            Some(precipitation.iter().filter(|mm| **mm >= HEAVY_RAIN_MM).count())
        },
    };
    debug!("{:?}", kpis);
    kpis
}

/// One row per (year, month) present in the series, ascending.
pub fn monthly_comparison(
    series: &ScrubbedSeries,
    reference: &ReferenceTable,
) -> Vec<MonthlyComparison> {
    let mut by_month: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for record in series.records() {
        let values = by_month
            .entry((record.date.year(), record.date.month()))
            .or_default();
        if let Some(kwh) = record.generation_kwh {
            values.push(kwh);
        }
    }

    by_month
        .into_iter()
        .map(|((year, month), values)| {
            let real_kwh = sum(&values);
            let reference_kwh = reference.get(month);
            let compliance_pct = match (real_kwh, reference_kwh) {
                (Some(real), Some(target)) if target != 0.0 => Some(100.0 * real / target),
                _ => None,
            };
            MonthlyComparison {
                year,
                month,
                real_kwh,
                reference_kwh,
                compliance_pct,
            }
        })
        .collect()
}
