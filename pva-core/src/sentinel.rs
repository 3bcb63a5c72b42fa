//! Missing-value sentinels of the weather source and their removal.
//!
//! NASA POWER reports "no observation" as -999 (and some products as
//! -9999). Those codes survive the merge untouched so the persisted merged
//! file stays raw; [`ScrubbedSeries`] is the only way KPI code gets to see
//! the data, and by then every sentinel has become `None`.

use crate::unified::UnifiedRecord;
use chrono::NaiveDate;

/// Reserved codes meaning "no observation".
pub const SENTINELS: [f64; 2] = [-999.0, -9999.0];

pub fn is_sentinel(value: f64) -> bool {
    SENTINELS.contains(&value)
}

/// Drop sentinels and non-finite values.
pub fn scrub(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && !is_sentinel(*v))
}

/// A unified series with every sentinel replaced by `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScrubbedSeries(Vec<UnifiedRecord>);

impl ScrubbedSeries {
    /// Scrub a merged series. Dates and order are untouched.
    pub fn from_unified(records: &[UnifiedRecord]) -> ScrubbedSeries {
        ScrubbedSeries(records.iter().map(|r| r.map_values(scrub)).collect())
    }

    pub fn records(&self) -> &[UnifiedRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First and last date of the series, if any.
    pub fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// All present values of one field.
    pub fn values<F>(&self, field: F) -> Vec<f64>
    where
        F: Fn(&UnifiedRecord) -> Option<f64>,
    {
        self.0.iter().filter_map(field).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{climate::ClimateRecord, generation::GenerationRecord};

    #[test]
    fn test_sentinel_variants() {
        assert!(is_sentinel(-999.0));
        assert!(is_sentinel(-9999.0));
        assert!(is_sentinel(-999_f64));
        assert!(!is_sentinel(-99.9));
        assert!(!is_sentinel(0.0));
    }

    #[test]
    fn test_scrub() {
        assert_eq!(scrub(Some(-999.0)), None);
        assert_eq!(scrub(Some(-9999.0)), None);
        assert_eq!(scrub(Some(f64::INFINITY)), None);
        assert_eq!(scrub(Some(0.0)), Some(0.0));
        assert_eq!(scrub(Some(-3.5)), Some(-3.5));
        assert_eq!(scrub(None), None);
    }

    #[test]
    fn test_series_scrubs_every_field() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let mut climate = ClimateRecord::empty(date);
        climate.solar_irradiance = Some(-999.0);
        climate.temp_max = Some(31.2);
        climate.precipitation = Some(-9999.0);
        let generation =
            GenerationRecord::from_values(date, [Some(-999.0), Some(10.0), None, None, None]);
        let raw = vec![UnifiedRecord::from_parts(&climate, &generation)];

        let series = ScrubbedSeries::from_unified(&raw);
        let record = &series.records()[0];
        assert_eq!(record.date, date);
        assert_eq!(record.solar_irradiance, None);
        assert_eq!(record.precipitation, None);
        assert_eq!(record.generation_kwh, None);
        assert_eq!(record.temp_max, Some(31.2));
        assert_eq!(record.consumption_kwh, Some(10.0));
        // the raw input is left alone
        assert_eq!(raw[0].solar_irradiance, Some(-999.0));
    }

    #[test]
    fn test_empty_series_has_no_period() {
        let series = ScrubbedSeries::from_unified(&[]);
        assert!(series.is_empty());
        assert_eq!(series.period(), None);
    }
}
