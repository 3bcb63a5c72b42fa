use crate::{climate::ClimateRecord, generation::GenerationRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column names of the merged output file, in write order.
pub const MERGED_COLUMNS: [&str; 11] = [
    "date",
    "solar_irradiance_kwh_m2",
    "temp_max_c",
    "temp_min_c",
    "cloud_fraction_pct",
    "precipitation_mm",
    "generation_kwh",
    "consumption_kwh",
    "self_consumption_kwh",
    "export_kwh",
    "import_kwh",
];

/// Columns a merged file must carry for the report to be built.
/// Precipitation is optional; the report says so when it is absent.
pub const REQUIRED_REPORT_COLUMNS: [&str; 6] = [
    "date",
    "generation_kwh",
    "solar_irradiance_kwh_m2",
    "cloud_fraction_pct",
    "temp_max_c",
    "temp_min_c",
];

/// A jointly observed day: climate and generation for the same date.
///
/// The serde names double as the merged file's CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedRecord {
    #[serde(with = "date_column")]
    pub date: NaiveDate,
    #[serde(rename = "solar_irradiance_kwh_m2")]
    pub solar_irradiance: Option<f64>,
    #[serde(rename = "temp_max_c")]
    pub temp_max: Option<f64>,
    #[serde(rename = "temp_min_c")]
    pub temp_min: Option<f64>,
    #[serde(rename = "cloud_fraction_pct")]
    pub cloud_fraction: Option<f64>,
    #[serde(rename = "precipitation_mm")]
    pub precipitation: Option<f64>,
    pub generation_kwh: Option<f64>,
    pub consumption_kwh: Option<f64>,
    pub self_consumption_kwh: Option<f64>,
    pub export_kwh: Option<f64>,
    pub import_kwh: Option<f64>,
}

impl UnifiedRecord {
    /// Join one climate day with the generation record of the same date.
    ///
    /// The caller guarantees equal dates; the climate date is kept.
    pub fn from_parts(climate: &ClimateRecord, generation: &GenerationRecord) -> UnifiedRecord {
        debug_assert_eq!(climate.date, generation.date);
        UnifiedRecord {
            date: climate.date,
            solar_irradiance: climate.solar_irradiance,
            temp_max: climate.temp_max,
            temp_min: climate.temp_min,
            cloud_fraction: climate.cloud_fraction,
            precipitation: climate.precipitation,
            generation_kwh: generation.generation_kwh,
            consumption_kwh: generation.consumption_kwh,
            self_consumption_kwh: generation.self_consumption_kwh,
            export_kwh: generation.export_kwh,
            import_kwh: generation.import_kwh,
        }
    }

    /// Apply `f` to every numeric field, keeping the date.
    pub fn map_values<F>(&self, f: F) -> UnifiedRecord
    where
        F: Fn(Option<f64>) -> Option<f64>,
    {
        UnifiedRecord {
            date: self.date,
            solar_irradiance: f(self.solar_irradiance),
            temp_max: f(self.temp_max),
            temp_min: f(self.temp_min),
            cloud_fraction: f(self.cloud_fraction),
            precipitation: f(self.precipitation),
            generation_kwh: f(self.generation_kwh),
            consumption_kwh: f(self.consumption_kwh),
            self_consumption_kwh: f(self.self_consumption_kwh),
            export_kwh: f(self.export_kwh),
            import_kwh: f(self.import_kwh),
        }
    }
}

/// Plain `YYYY-MM-DD` dates in the merged file.
mod date_column {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&pva_utils::dates::format_date(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        // tolerate a trailing time part written by spreadsheet tools
        let day = raw.trim().split(|c: char| c == ' ' || c == 'T').next().unwrap_or_default();
        pva_utils::dates::parse_date(day).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn may(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, day).unwrap()
    }

    #[test]
    fn test_from_parts() {
        let mut climate = ClimateRecord::empty(may(1));
        climate.solar_irradiance = Some(5.0);
        climate.cloud_fraction = Some(80.0);
        let generation =
            GenerationRecord::from_values(may(1), [Some(2.5), Some(4.0), Some(2.0), Some(0.5), Some(2.0)]);
        let unified = UnifiedRecord::from_parts(&climate, &generation);
        assert_eq!(unified.date, may(1));
        assert_eq!(unified.solar_irradiance, Some(5.0));
        assert_eq!(unified.generation_kwh, Some(2.5));
        assert_eq!(unified.export_kwh, Some(0.5));
        assert_eq!(unified.precipitation, None);
    }

    #[test]
    fn test_csv_header_matches_column_list() {
        let record = UnifiedRecord::from_parts(
            &ClimateRecord::empty(may(2)),
            &GenerationRecord::from_values(may(2), [Some(3.0), None, None, None, None]),
        );
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(&record).unwrap();
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), MERGED_COLUMNS.join(","));
        assert_eq!(lines.next().unwrap(), "2023-05-02,,,,,,3.0,,,,");
    }
}
