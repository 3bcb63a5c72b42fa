//! Data processing for PV plant observations.
//!
//! This crate turns a raw meter export and a set of climate records into a
//! merged daily series, and derives the indicators reported on it. Stages
//! run in order and each one only reads what the previous one produced:
//!
//! 1. [`loader`] reads the meter export (workbook or CSV) into raw rows.
//! 2. [`normalize`] fixes dates and units and consolidates rows per day.
//! 3. [`merge`] inner-joins generation and climate days.
//! 4. [`export`] persists the merged series (raw, sentinels included).
//! 5. [`kpi`] computes indicators on the sentinel-scrubbed series.

pub mod export;
pub mod kpi;
pub mod loader;
pub mod merge;
pub mod normalize;
