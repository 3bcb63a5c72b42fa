//! Unit and date normalization of meter rows.
//!
//! Dates arrive either as spreadsheet serial day counts or as day-first
//! text; energy arrives in Wh. The output is one [`GenerationRecord`] per
//! calendar day, in kWh, with intraday readings summed.

use chrono::NaiveDate;
use log::{debug, info, warn};
use pva_core::generation::{
    GenerationRecord, RawCell, RawGenerationRow, ENERGY_COLUMNS, ENERGY_COLUMN_NAMES, WH_PER_KWH,
};
use pva_utils::dates::{from_serial_days, parse_day_first};
use std::collections::BTreeMap;

/// Row-level bookkeeping of a normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub total_rows: usize,
    /// Rows dropped because the date could not be interpreted.
    pub dropped_rows: usize,
    /// Energy cells that were present but not a usable number.
    pub nulled_values: usize,
    /// Distinct days after consolidation.
    pub days: usize,
}

/// Interpret a date cell: numbers are serial days, text is day-first.
///
/// Purely numeric text (as found in CSV exports) is treated as a serial.
pub fn parse_date_cell(cell: &RawCell) -> Option<NaiveDate> {
    match cell {
        RawCell::Number(serial) => from_serial_days(*serial),
        RawCell::Text(text) => match text.trim().parse::<f64>() {
            Ok(serial) => from_serial_days(serial),
            Err(_) => parse_day_first(text),
        },
        RawCell::Empty => None,
    }
}

/// Interpret an energy cell in Wh and return kWh.
///
/// Non-numeric, non-finite and negative readings are `None`.
pub fn parse_energy_cell(cell: &RawCell) -> Option<f64> {
    let wh = match cell {
        RawCell::Number(n) => *n,
        RawCell::Text(text) => text.trim().parse::<f64>().ok()?,
        RawCell::Empty => return None,
    };
    if wh.is_finite() && wh >= 0.0 {
        Some(wh / WH_PER_KWH)
    } else {
        None
    }
}

/// Normalize and consolidate meter rows into daily records, ascending.
pub fn normalize_generation(rows: &[RawGenerationRow]) -> (Vec<GenerationRecord>, NormalizeReport) {
    let mut report = NormalizeReport {
        total_rows: rows.len(),
        ..Default::default()
    };
    let mut by_date: BTreeMap<NaiveDate, GenerationRecord> = BTreeMap::new();

    for row in rows {
        let Some(date) = parse_date_cell(&row.date) else {
            debug!("Dropping meter row with unparseable date {:?}", row.date);
            report.dropped_rows += 1;
            continue;
        };

        let mut values = [None; ENERGY_COLUMNS];
        for (i, cell) in row.energy_wh.iter().enumerate() {
            values[i] = parse_energy_cell(cell);
            if values[i].is_none() && *cell != RawCell::Empty {
                debug!("Unusable {} value {:?} on {}", ENERGY_COLUMN_NAMES[i], cell, date);
                report.nulled_values += 1;
            }
        }

        by_date
            .entry(date)
            .and_modify(|record| record.accumulate(values))
            .or_insert_with(|| GenerationRecord::from_values(date, values));
    }

    report.days = by_date.len();

    if report.dropped_rows > 0 {
        warn!(
            "Dropped {} of {} meter rows with an unparseable date",
            report.dropped_rows, report.total_rows
        );
    }
    if report.nulled_values > 0 {
        warn!("{} energy values were not usable numbers and were left empty", report.nulled_values);
    }
    info!(
        "Normalized {} meter rows into {} generation days",
        report.total_rows, report.days
    );

    (by_date.into_values().collect(), report)
}
