//! TOML run configuration.
//!
//! Every section and key is optional; the defaults describe the plant the
//! toolkit was first written for.
//!
//! ```toml
//! [site]
//! name = "Rooftop plant"
//! latitude = 8.7563
//! longitude = -75.8886
//!
//! [period]
//! start = "2023-05-01"
//! end = "2025-10-21"
//!
//! [input]
//! generation = "data/generation.xlsx"
//! header_row = 1
//! ```

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use pva_core::{
    error::PvaError,
    power::{PowerQuery, DEFAULT_COMMUNITY, POWER_BASE_URL},
};
use pva_data::loader::{SheetOptions, DEFAULT_HEADER_ROW};
use pva_report::ChartImages;
use pva_utils::dates::parse_date;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteSettings,
    pub period: PeriodSettings,
    pub power: PowerSettings,
    pub input: InputSettings,
    pub output: OutputSettings,
    pub charts: ChartImages,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_site_name")]
    pub name: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PeriodSettings {
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default = "default_end")]
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PowerSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_community")]
    pub community: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputSettings {
    #[serde(default = "default_generation")]
    pub generation: PathBuf,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default = "default_header_row")]
    pub header_row: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_merged_csv")]
    pub merged_csv: PathBuf,
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
}

fn default_site_name() -> String {
    "Supermercado Cabeza y Cola solar plant".to_owned()
}

fn default_latitude() -> f64 {
    8.7563
}

fn default_longitude() -> f64 {
    -75.8886
}

fn default_start() -> String {
    "2023-05-01".to_owned()
}

fn default_end() -> String {
    "2025-10-21".to_owned()
}

fn default_base_url() -> String {
    POWER_BASE_URL.to_owned()
}

fn default_community() -> String {
    DEFAULT_COMMUNITY.to_owned()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_generation() -> PathBuf {
    PathBuf::from("data/generation.xlsx")
}

fn default_header_row() -> usize {
    DEFAULT_HEADER_ROW
}

fn default_merged_csv() -> PathBuf {
    PathBuf::from("results/merged.csv")
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("results")
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            author: None,
        }
    }
}

impl Default for PeriodSettings {
    fn default() -> Self {
        Self {
            start: default_start(),
            end: default_end(),
        }
    }
}

impl Default for PowerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            community: default_community(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            generation: default_generation(),
            sheet: None,
            header_row: default_header_row(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            merged_csv: default_merged_csv(),
            report_dir: default_report_dir(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub start: Option<String>,
    pub end: Option<String>,
    pub generation: Option<PathBuf>,
    pub merged_csv: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML: {}", path.display()))
    }

    /// Load the file if one is given, apply overrides and validate.
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(start) = &overrides.start {
            self.period.start = start.clone();
        }
        if let Some(end) = &overrides.end {
            self.period.end = end.clone();
        }
        if let Some(generation) = &overrides.generation {
            self.input.generation = generation.clone();
        }
        if let Some(merged_csv) = &overrides.merged_csv {
            self.output.merged_csv = merged_csv.clone();
        }
        if let Some(report_dir) = &overrides.report_dir {
            self.output.report_dir = report_dir.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        let (start, end) = self.period()?;
        if start > end {
            bail!(PvaError::Config(format!(
                "period.start {} is after period.end {}",
                start, end
            )));
        }
        if !(-90.0..=90.0).contains(&self.site.latitude) {
            bail!(PvaError::Config(format!(
                "site.latitude {} is outside -90..90",
                self.site.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.site.longitude) {
            bail!(PvaError::Config(format!(
                "site.longitude {} is outside -180..180",
                self.site.longitude
            )));
        }
        if self.power.timeout_secs == 0 {
            bail!(PvaError::Config("power.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Analysis period as dates.
    pub fn period(&self) -> Result<(NaiveDate, NaiveDate)> {
        let start = parse_date(&self.period.start).map_err(|e| {
            PvaError::Config(format!(
                "period.start '{}' is not YYYY-MM-DD: {}",
                self.period.start, e
            ))
        })?;
        let end = parse_date(&self.period.end).map_err(|e| {
            PvaError::Config(format!(
                "period.end '{}' is not YYYY-MM-DD: {}",
                self.period.end, e
            ))
        })?;
        Ok((start, end))
    }

    pub fn power_query(&self) -> Result<PowerQuery> {
        let (start, end) = self.period()?;
        Ok(PowerQuery {
            start,
            end,
            latitude: self.site.latitude,
            longitude: self.site.longitude,
            community: self.power.community.clone(),
        })
    }

    pub fn power_timeout(&self) -> Duration {
        Duration::from_secs(self.power.timeout_secs)
    }

    pub fn sheet_options(&self) -> SheetOptions {
        SheetOptions {
            sheet: self.input.sheet.clone(),
            header_row: self.input.header_row,
        }
    }
}
