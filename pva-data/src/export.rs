//! The merged output file: one CSV row per jointly observed day.
//!
//! Values are written raw, sentinels included. The report stage reads the
//! file back and scrubs it itself.

use log::{info, warn};
use pva_core::{
    error::{PvaError, Result},
    unified::{UnifiedRecord, MERGED_COLUMNS, REQUIRED_REPORT_COLUMNS},
};
use std::{collections::BTreeMap, fs, path::Path};

const PRECIPITATION_COLUMN: &str = "precipitation_mm";

/// Write the merged series, creating the parent directory if needed.
///
/// The header is always written, even for an empty series.
pub fn write_merged_csv(path: &Path, records: &[UnifiedRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    wtr.write_record(MERGED_COLUMNS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    info!("Wrote {} merged days to {}", records.len(), path.display());
    Ok(())
}

/// Read a merged file for reporting, ascending with one record per date.
///
/// Fails when the file is absent or lacks one of the columns the report
/// needs. Precipitation and the secondary energy columns are optional and
/// read as empty when absent.
pub fn read_merged_csv(path: &Path) -> Result<Vec<UnifiedRecord>> {
    if !path.exists() {
        return Err(PvaError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let mut rdr = csv::Reader::from_path(path)?;
    let headers = rdr.headers()?.clone();
    let has_column = |name: &str| headers.iter().any(|h| h.trim() == name);

    if let Some(missing) = REQUIRED_REPORT_COLUMNS.iter().find(|&&c| !has_column(c)) {
        return Err(PvaError::MissingColumn {
            column: missing.to_string(),
            path: path.to_path_buf(),
        });
    }
    if !has_column(PRECIPITATION_COLUMN) {
        warn!("{} has no {} column", path.display(), PRECIPITATION_COLUMN);
    }

    let mut by_date: BTreeMap<_, UnifiedRecord> = BTreeMap::new();
    let mut rows = 0;
    for result in rdr.deserialize() {
        let record: UnifiedRecord = result?;
        rows += 1;
        by_date.insert(record.date, record);
    }
    if by_date.len() < rows {
        warn!(
            "{} repeats {} dates; keeping the last row of each",
            path.display(),
            rows - by_date.len()
        );
    }

    Ok(by_date.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pva_core::{climate::ClimateRecord, generation::GenerationRecord};
    use tempfile::tempdir;

    fn record(day: u32, generation: f64, irradiance: f64) -> UnifiedRecord {
        let date = NaiveDate::from_ymd_opt(2023, 5, day).unwrap();
        let mut climate = ClimateRecord::empty(date);
        climate.solar_irradiance = Some(irradiance);
        climate.precipitation = Some(1.5);
        UnifiedRecord::from_parts(
            &climate,
            &GenerationRecord::from_values(date, [Some(generation), Some(1.0), None, None, None]),
        )
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("merged.csv");
        let records = vec![record(1, 2.5, 5.0), record(2, 3.0, -999.0)];

        write_merged_csv(&path, &records).unwrap();
        let merged = read_merged_csv(&path).unwrap();

        assert_eq!(merged, records);
        // sentinels are persisted raw
        assert_eq!(merged[1].solar_irradiance, Some(-999.0));
    }

    #[test]
    fn test_empty_series_still_has_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("merged.csv");
        write_merged_csv(&path, &[]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), MERGED_COLUMNS.join(","));
        assert!(read_merged_csv(&path).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_merged_csv(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(PvaError::MissingInput { .. })));
    }

    #[test]
    fn test_missing_required_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("merged.csv");
        fs::write(
            &path,
            "date,solar_irradiance_kwh_m2,temp_max_c,temp_min_c,generation_kwh\n2023-05-01,5.0,31,23,2.5\n",
        )
        .unwrap();

        match read_merged_csv(&path) {
            Err(PvaError::MissingColumn { column, .. }) => assert_eq!(column, "cloud_fraction_pct"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_optional_columns_and_unsorted_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("merged.csv");
        fs::write(
            &path,
            "date,generation_kwh,solar_irradiance_kwh_m2,cloud_fraction_pct,temp_max_c,temp_min_c\n\
             2023-05-02 00:00:00,3.0,4.0,90,32,22\n\
             2023-05-01,2.5,5.0,80,33,23\n",
        )
        .unwrap();

        let merged = read_merged_csv(&path).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].date, NaiveDate::from_ymd_opt(2023, 5, 1).unwrap());
        assert_eq!(merged[1].generation_kwh, Some(3.0));
        assert!(merged.iter().all(|r| r.precipitation.is_none()));
        assert_eq!(merged[1].export_kwh, None);
    }
}
