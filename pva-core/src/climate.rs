use chrono::NaiveDate;

/// NASA POWER parameter code for all-sky surface shortwave irradiance, kWh/m²/day.
pub const PARAM_IRRADIANCE: &str = "ALLSKY_SFC_SW_DWN";

/// NASA POWER parameter code for daily maximum temperature at 2 m, °C.
pub const PARAM_TEMP_MAX: &str = "T2M_MAX";

/// NASA POWER parameter code for daily minimum temperature at 2 m, °C.
pub const PARAM_TEMP_MIN: &str = "T2M_MIN";

/// NASA POWER parameter code for cloud amount, %.
pub const PARAM_CLOUD_AMOUNT: &str = "CLOUD_AMT";

/// NASA POWER parameter code for bias-corrected precipitation, mm/day.
pub const PARAM_PRECIPITATION: &str = "PRECTOTCORR";

/// The five climate drivers requested for every run.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum ClimateParameter {
    Irradiance,
    TempMax,
    TempMin,
    CloudAmount,
    Precipitation,
}

impl ClimateParameter {
    pub const ALL: [ClimateParameter; 5] = [
        ClimateParameter::Irradiance,
        ClimateParameter::TempMax,
        ClimateParameter::TempMin,
        ClimateParameter::CloudAmount,
        ClimateParameter::Precipitation,
    ];

    /// Source code used by the NASA POWER API.
    pub fn code(&self) -> &'static str {
        match self {
            ClimateParameter::Irradiance => PARAM_IRRADIANCE,
            ClimateParameter::TempMax => PARAM_TEMP_MAX,
            ClimateParameter::TempMin => PARAM_TEMP_MIN,
            ClimateParameter::CloudAmount => PARAM_CLOUD_AMOUNT,
            ClimateParameter::Precipitation => PARAM_PRECIPITATION,
        }
    }

    pub fn from_code(code: &str) -> Option<ClimateParameter> {
        ClimateParameter::ALL
            .into_iter()
            .find(|param| param.code() == code)
    }

    /// Comma-separated list for the `parameters` query argument.
    pub fn query_list() -> String {
        ClimateParameter::ALL
            .iter()
            .map(|param| param.code())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// One day of climate observations for the plant location.
///
/// Values are carried exactly as delivered, sentinels included; a parameter
/// the payload did not report for this date is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateRecord {
    pub date: NaiveDate,
    /// kWh/m²/day
    pub solar_irradiance: Option<f64>,
    /// °C
    pub temp_max: Option<f64>,
    /// °C
    pub temp_min: Option<f64>,
    /// %
    pub cloud_fraction: Option<f64>,
    /// mm/day
    pub precipitation: Option<f64>,
}

impl ClimateRecord {
    pub fn empty(date: NaiveDate) -> ClimateRecord {
        ClimateRecord {
            date,
            solar_irradiance: None,
            temp_max: None,
            temp_min: None,
            cloud_fraction: None,
            precipitation: None,
        }
    }

    pub fn get(&self, param: ClimateParameter) -> Option<f64> {
        match param {
            ClimateParameter::Irradiance => self.solar_irradiance,
            ClimateParameter::TempMax => self.temp_max,
            ClimateParameter::TempMin => self.temp_min,
            ClimateParameter::CloudAmount => self.cloud_fraction,
            ClimateParameter::Precipitation => self.precipitation,
        }
    }

    pub fn set(&mut self, param: ClimateParameter, value: Option<f64>) {
        let slot = match param {
            ClimateParameter::Irradiance => &mut self.solar_irradiance,
            ClimateParameter::TempMax => &mut self.temp_max,
            ClimateParameter::TempMin => &mut self.temp_min,
            ClimateParameter::CloudAmount => &mut self.cloud_fraction,
            ClimateParameter::Precipitation => &mut self.precipitation,
        };
        *slot = value;
    }
}
