//! Meter export loading.
//!
//! The plant's monitoring portal exports one sheet with a title line, a
//! header row and then data rows in a fixed column order:
//!
//! ```text
//! <title>
//! Date, Generation (Wh), Consumption (Wh), Self-consumption (Wh), Export (Wh), Import (Wh)
//! 01/05/2025, 2000000, 1500000, 900000, 1100000, 600000
//! ```
//!
//! Workbooks (`xlsx`, `xlsm`, `xls`, `ods`) are read with calamine, CSV
//! exports with the csv crate. Headers are not interpreted: columns are
//! taken by position.

use calamine::{open_workbook_auto, Data, Reader};
use log::info;
use pva_core::{
    error::{PvaError, Result},
    generation::{RawCell, RawGenerationRow, ENERGY_COLUMNS},
};
use std::path::Path;

/// Default zero-based index of the header row (one title line above it).
pub const DEFAULT_HEADER_ROW: usize = 1;

/// Where the table sits inside the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOptions {
    /// Worksheet to read; the first one when `None`. Ignored for CSV.
    pub sheet: Option<String>,
    /// Zero-based row index of the header; data starts on the next row.
    pub header_row: usize,
}

impl Default for SheetOptions {
    fn default() -> Self {
        SheetOptions {
            sheet: None,
            header_row: DEFAULT_HEADER_ROW,
        }
    }
}

/// Read every data row of a meter export.
///
/// A missing file is fatal. Blank rows are skipped; short rows are padded
/// with empty cells so the normalizer can null the missing values.
pub fn load_generation_rows(path: &Path, options: &SheetOptions) -> Result<Vec<RawGenerationRow>> {
    if !path.exists() {
        return Err(PvaError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let rows = if is_csv {
        load_csv_rows(path, options.header_row)?
    } else {
        load_workbook_rows(path, options)?
    };

    info!(
        "Loaded {} data rows from {}",
        pva_utils::numbers::format_int(rows.len()),
        path.display()
    );
    Ok(rows)
}

fn load_csv_rows(path: &Path, header_row: usize) -> Result<Vec<RawGenerationRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        if index <= header_row {
            continue;
        }
        let cells: Vec<RawCell> = record.iter().map(RawCell::from_text).collect();
        if let Some(row) = row_from_cells(cells) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn load_workbook_rows(path: &Path, options: &SheetOptions) -> Result<Vec<RawGenerationRow>> {
    let spreadsheet_error = |reason: String| PvaError::Spreadsheet {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_error(e.to_string()))?;

    let sheet_name = match &options.sheet {
        Some(name) => name.clone(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| spreadsheet_error("workbook has no sheets".to_string()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| spreadsheet_error(format!("sheet '{}': {}", sheet_name, e)))?;

    // the range starts at the first used cell, the header offset counts from
    // the top of the sheet
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows = Vec::new();
    for (offset, cells) in range.rows().enumerate() {
        if first_row + offset <= options.header_row {
            continue;
        }
        let cells: Vec<RawCell> = cells.iter().map(cell_from_data).collect();
        if let Some(row) = row_from_cells(cells) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn cell_from_data(data: &Data) -> RawCell {
    match data {
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        // native date cells carry the same serial day count as numeric ones
        Data::DateTime(dt) => RawCell::Number(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) => RawCell::from_text(s),
        _ => RawCell::Empty,
    }
}

/// Take the date plus five energy cells; `None` for an all-blank row.
fn row_from_cells(mut cells: Vec<RawCell>) -> Option<RawGenerationRow> {
    if cells.iter().all(|cell| *cell == RawCell::Empty) {
        return None;
    }
    cells.resize(ENERGY_COLUMNS + 1, RawCell::Empty);
    let mut cells = cells.into_iter();
    let date = cells.next().unwrap_or(RawCell::Empty);
    let energy_wh: [RawCell; ENERGY_COLUMNS] =
        std::array::from_fn(|_| cells.next().unwrap_or(RawCell::Empty));
    Some(RawGenerationRow { date, energy_wh })
}
