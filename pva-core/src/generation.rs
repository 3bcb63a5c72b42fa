use chrono::NaiveDate;

/// Number of energy columns following the date column in a meter export.
pub const ENERGY_COLUMNS: usize = 5;

/// Names of the energy columns in meter export order.
pub const ENERGY_COLUMN_NAMES: [&str; ENERGY_COLUMNS] = [
    "generation",
    "consumption",
    "self_consumption",
    "export",
    "import",
];

/// Watt-hours per kilowatt-hour.
pub const WH_PER_KWH: f64 = 1000.0;

/// A cell as read from the meter export, before any interpretation.
///
/// Workbooks hand out typed cells, CSV exports only text; both end up here
/// so the normalizer has a single input shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

impl RawCell {
    /// Build a cell from CSV text: blank becomes `Empty`, everything else
    /// stays text so numeric-looking dates are not mistaken for serials.
    pub fn from_text(s: &str) -> RawCell {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(trimmed.to_string())
        }
    }
}

/// One data row of the meter export: date followed by five Wh columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGenerationRow {
    pub date: RawCell,
    pub energy_wh: [RawCell; ENERGY_COLUMNS],
}

/// Daily energy balance of the plant, in kWh.
///
/// A field is `None` when no reading of that day carried a usable value.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    pub date: NaiveDate,
    pub generation_kwh: Option<f64>,
    pub consumption_kwh: Option<f64>,
    pub self_consumption_kwh: Option<f64>,
    pub export_kwh: Option<f64>,
    pub import_kwh: Option<f64>,
}

impl GenerationRecord {
    /// Build a record from the five kWh values in export column order.
    pub fn from_values(
        date: NaiveDate,
        values: [Option<f64>; ENERGY_COLUMNS],
    ) -> GenerationRecord {
        let [generation_kwh, consumption_kwh, self_consumption_kwh, export_kwh, import_kwh] = values;
        GenerationRecord {
            date,
            generation_kwh,
            consumption_kwh,
            self_consumption_kwh,
            export_kwh,
            import_kwh,
        }
    }

    /// The five kWh values in export column order.
    pub fn values(&self) -> [Option<f64>; ENERGY_COLUMNS] {
        [
            self.generation_kwh,
            self.consumption_kwh,
            self.self_consumption_kwh,
            self.export_kwh,
            self.import_kwh,
        ]
    }

    /// Fold another reading of the same day into this one.
    pub fn accumulate(&mut self, values: [Option<f64>; ENERGY_COLUMNS]) {
        let current = self.values();
        let mut summed = [None; ENERGY_COLUMNS];
        for (i, slot) in summed.iter_mut().enumerate() {
            *slot = sum_optional(current[i], values[i]);
        }
        *self = GenerationRecord::from_values(self.date, summed);
    }
}

/// Sum that ignores missing operands; missing only if both are.
pub fn sum_optional(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x + y),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_sums_present_values() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        let mut record =
            GenerationRecord::from_values(date, [Some(2000.0), Some(1.0), None, None, Some(0.5)]);
        record.accumulate([Some(500.0), None, Some(3.0), None, Some(0.25)]);
        assert_eq!(record.generation_kwh, Some(2500.0));
        assert_eq!(record.consumption_kwh, Some(1.0));
        assert_eq!(record.self_consumption_kwh, Some(3.0));
        assert_eq!(record.export_kwh, None);
        assert_eq!(record.import_kwh, Some(0.75));
    }

    #[test]
    fn test_raw_cell_from_text() {
        assert_eq!(RawCell::from_text("  "), RawCell::Empty);
        assert_eq!(
            RawCell::from_text(" 01/05/2023 "),
            RawCell::Text("01/05/2023".to_string())
        );
    }
}
