//! Inner join of the climate and generation series on calendar date.

use chrono::NaiveDate;
use log::{info, warn};
use pva_core::{climate::ClimateRecord, generation::GenerationRecord, unified::UnifiedRecord};
use std::collections::BTreeMap;

/// How many days each side contributed to the join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub joined: usize,
    pub climate_only: usize,
    pub generation_only: usize,
}

/// Keep only dates present in both series, ascending.
///
/// Inputs need not be sorted. A date appearing twice on one side keeps the
/// last occurrence; upstream stages already produce one record per day.
pub fn merge_series(
    climate: &[ClimateRecord],
    generation: &[GenerationRecord],
) -> (Vec<UnifiedRecord>, MergeReport) {
    let climate_by_date: BTreeMap<NaiveDate, &ClimateRecord> =
        climate.iter().map(|c| (c.date, c)).collect();
    let generation_by_date: BTreeMap<NaiveDate, &GenerationRecord> =
        generation.iter().map(|g| (g.date, g)).collect();

    let merged: Vec<UnifiedRecord> = climate_by_date
        .iter()
        .filter_map(|(date, c)| {
            generation_by_date
                .get(date)
                .map(|g| UnifiedRecord::from_parts(c, g))
        })
        .collect();

    let report = MergeReport {
        joined: merged.len(),
        climate_only: climate_by_date.len() - merged.len(),
        generation_only: generation_by_date.len() - merged.len(),
    };

    if report.joined == 0 {
        warn!(
            "Climate ({} days) and generation ({} days) share no dates",
            climate_by_date.len(),
            generation_by_date.len()
        );
    } else {
        info!(
            "Merged {} days; dropped {} climate-only and {} generation-only days",
            report.joined, report.climate_only, report.generation_only
        );
    }

    (merged, report)
}
