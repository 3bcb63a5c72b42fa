//! Report prose built from the computed indicators.

use pva_core::sentinel::ScrubbedSeries;
use pva_data::kpi::{KpiSet, MonthlyComparison, HEAVY_RAIN_MM};
use pva_utils::{
    dates::format_date,
    numbers::{format_number, format_optional},
};

/// Days at or above this cloud fraction count as overcast.
pub const OVERCAST_PCT: f64 = 90.0;

pub const CONCLUSIONS: [&str; 2] = [
    "Generation follows the incident irradiance; the remaining gap to the PV*SOL estimate comes from cloud cover, thermal losses and soiling.",
    "Months with compliance well below 100 % deserve a closer look at the string and inverter level before attributing the deficit to weather.",
];

pub const RECOMMENDATIONS: [&str; 4] = [
    "Schedule module washing after rain events and before the dry season.",
    "Review strings and run IV curve inspections to rule out mismatch or hotspots.",
    "Check inverter limits and curtailment settings, and the quality of the grid connection.",
    "Set up a monitoring dashboard combining NASA POWER and meter data for performance alerts.",
];

/// Generation over reference across the months that have both values.
pub fn overall_compliance(monthly: &[MonthlyComparison]) -> Option<f64> {
    let (real, reference) = monthly
        .iter()
        .filter_map(|m| Some((m.real_kwh?, m.reference_kwh?)))
        .fold((0.0, 0.0), |(r, t), (real, target)| (r + real, t + target));
    if reference > 0.0 {
        Some(100.0 * real / reference)
    } else {
        None
    }
}

pub fn summary(kpis: &KpiSet, monthly: &[MonthlyComparison]) -> String {
    if kpis.days_analyzed == 0 {
        return "No day was observed by both the weather source and the meter, so no indicator \
                could be computed for this period."
            .to_string();
    }
    let mut text = format!(
        "Over {} jointly observed days ({} calendar days) the plant generated {} kWh, \
         an average of {} kWh per day, with a mean simplified performance ratio of {}.",
        kpis.days_analyzed,
        kpis.calendar_days,
        format_optional(kpis.total_generation_kwh, 0),
        format_optional(kpis.mean_generation_kwh, 1),
        format_optional(kpis.mean_performance_ratio, 2),
    );
    if let Some(pct) = overall_compliance(monthly) {
        text.push_str(&format!(
            " Across the months with a reference value, generation reached {} % of the PV*SOL estimate.",
            format_number(pct, 1)
        ));
    }
    text
}

pub fn irradiance(kpis: &KpiSet, series: &ScrubbedSeries) -> String {
    let mut text = format!(
        "Mean daily irradiance was {} kWh/m². Generation tracks the available irradiance; \
         days that fall below the usual ratio point to losses from temperature, soiling, \
         inverter limits or partial shading.",
        format_optional(kpis.mean_irradiance, 2)
    );
    let best = series
        .records()
        .iter()
        .filter_map(|r| r.generation_kwh.map(|kwh| (r.date, kwh)))
        .max_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((date, kwh)) = best {
        text.push_str(&format!(
            " The best day was {} with {} kWh.",
            format_date(&date),
            format_number(kwh, 1)
        ));
    }
    text
}

pub fn cloud_cover(kpis: &KpiSet, series: &ScrubbedSeries) -> String {
    let observed = series.values(|r| r.cloud_fraction);
    if observed.is_empty() {
        return "Cloud cover was not reported for any analyzed day.".to_string();
    }
    let overcast = observed.iter().filter(|pct| **pct >= OVERCAST_PCT).count();
    format!(
        "Mean cloud cover was {} %, with {} of {} days at or above {} %. \
         Persistent cloud lowers the irradiance reaching the array and explains a large \
         share of the low-generation days.",
        format_optional(kpis.mean_cloud_fraction, 1),
        overcast,
        observed.len(),
        OVERCAST_PCT
    )
}

pub fn precipitation(kpis: &KpiSet) -> String {
    match (kpis.total_precipitation_mm, kpis.heavy_rain_days) {
        (Some(total), Some(heavy)) => format!(
            "Total precipitation was {} mm, with {} heavy rain days (at least {} mm/day). \
             Rain reduces effective irradiance but also cleans the modules; a slight recovery \
             in efficiency is usually visible one or two days after heavy rain.",
            format_number(total, 1),
            heavy,
            HEAVY_RAIN_MM
        ),
        _ => "Precipitation is not available in the merged data for this period. \
              Request PRECTOTCORR from NASA POWER and rerun the merge to include it."
            .to_string(),
    }
}

pub fn temperature(kpis: &KpiSet) -> String {
    format!(
        "Mean daily maximum temperature was {} °C and mean minimum {} °C. With a module \
         temperature coefficient of about -0.4 %/°C, each degree of cell temperature above \
         25 °C costs roughly 0.4 % of output.",
        format_optional(kpis.mean_temp_max, 1),
        format_optional(kpis.mean_temp_min, 1)
    )
}

pub fn table_intro(monthly: &[MonthlyComparison]) -> String {
    if monthly.is_empty() {
        "No month has generation data to compare against the PV*SOL estimate.".to_string()
    } else {
        format!(
            "Monthly generation compared with the PV*SOL estimate over {} month(s). \
             Months without a reference value are shown as n/a.",
            monthly.len()
        )
    }
}
