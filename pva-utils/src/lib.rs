//! Shared utility functions for PVA crates.

/// Date utility functions
pub mod dates {
    use chrono::{NaiveDate, TimeDelta};

    /// Date format used for NASA POWER query parameters and response keys: "YYYYMMDD"
    pub const COMPACT_FORMAT: &str = "%Y%m%d";

    /// Day-first formats accepted for textual meter dates. Two-digit year
    /// variants come first because `%Y` would happily read "23" as year 23.
    const DAY_FIRST_FORMATS: [&str; 6] = [
        "%d/%m/%y", "%d/%m/%Y", "%d-%m-%y", "%d-%m-%Y", "%d.%m.%y", "%d.%m.%Y",
    ];

    /// Year-first formats, tried only after every day-first format failed.
    const YEAR_FIRST_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Format a NaiveDate as "YYYYMMDD"
    pub fn format_date_compact(date: &NaiveDate) -> String {
        date.format(COMPACT_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Parse a date string in "YYYYMMDD" format (NASA POWER compact format)
    pub fn parse_date_compact(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, COMPACT_FORMAT)?)
    }

    /// Day zero of spreadsheet serial dates.
    pub fn serial_epoch() -> NaiveDate {
        NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
    }

    /// Convert a spreadsheet serial day count into a calendar date.
    ///
    /// The fractional part is a time of day and is dropped, so every reading
    /// taken on one day maps to the same date. Non-finite or out of range
    /// serials yield `None`.
    pub fn from_serial_days(serial: f64) -> Option<NaiveDate> {
        if !serial.is_finite() {
            return None;
        }
        let days = serial.floor();
        if days.abs() > 3_000_000.0 {
            return None;
        }
        let delta = TimeDelta::try_days(days as i64)?;
        serial_epoch().checked_add_signed(delta)
    }

    /// Parse a textual meter date, day first.
    ///
    /// Accepts `DD/MM/YYYY`, `DD-MM-YYYY` and `DD.MM.YYYY` with two or four
    /// digit years, falling back to year-first ISO dates. Anything after the
    /// first space (or an ISO `T`) is a time of day and is ignored.
    pub fn parse_day_first(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let date_part = s
            .split(|c: char| c.is_whitespace() || c == 'T')
            .next()
            .unwrap_or(s);
        DAY_FIRST_FORMATS
            .iter()
            .chain(YEAR_FIRST_FORMATS.iter())
            .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_serial_days() {
            assert_eq!(from_serial_days(0.0), NaiveDate::from_ymd_opt(1899, 12, 30));
            // 45047 is 2023-05-01 in spreadsheet serial form
            assert_eq!(from_serial_days(45047.0), NaiveDate::from_ymd_opt(2023, 5, 1));
            // intraday readings collapse onto their calendar day
            assert_eq!(from_serial_days(45047.75), NaiveDate::from_ymd_opt(2023, 5, 1));
            assert_eq!(from_serial_days(f64::NAN), None);
        }

        #[test]
        fn test_parse_day_first() {
            let may_first = NaiveDate::from_ymd_opt(2023, 5, 1);
            assert_eq!(parse_day_first("01/05/2023"), may_first);
            assert_eq!(parse_day_first("1/5/2023"), may_first);
            assert_eq!(parse_day_first("01-05-2023"), may_first);
            assert_eq!(parse_day_first("01.05.23"), may_first);
            assert_eq!(parse_day_first("01/05/2023 13:45"), may_first);
            assert_eq!(parse_day_first("2023-05-01"), may_first);
            assert_eq!(parse_day_first("2023-05-01T08:00:00"), may_first);
        }

        #[test]
        fn test_parse_day_first_rejects_garbage() {
            assert_eq!(parse_day_first(""), None);
            assert_eq!(parse_day_first("Total"), None);
            assert_eq!(parse_day_first("31/02/2023"), None);
            // month 13 only makes sense month-first, which is not accepted
            assert_eq!(parse_day_first("05/13/2023"), None);
        }

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
            assert_eq!(format_date_compact(&date), "20230615");
            assert_eq!(parse_date_compact("20230615").unwrap(), date);
        }
    }
}

/// Number formatting for console and report output
pub mod numbers {
    use num_format::{Locale, ToFormattedString};

    /// Label used wherever a derived value is undefined.
    pub const NOT_AVAILABLE: &str = "n/a";

    /// Format with a fixed number of decimals and thousands separators,
    /// e.g. `1,234,567.89`.
    pub fn format_number(n: f64, decimals: usize) -> String {
        let neg = n.is_sign_negative();
        let s = format!("{:.*}", decimals, n.abs());
        let mut parts = s.split('.');
        let int_val: i64 = parts.next().unwrap_or("0").parse().unwrap_or(0);
        let mut res = int_val.to_formatted_string(&Locale::en);
        if let Some(frac) = parts.next() {
            res.push('.');
            res.push_str(frac);
        }
        if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
            format!("-{}", res)
        } else {
            res
        }
    }

    /// Like [`format_number`] but renders `None` (and non-finite values) as "n/a".
    pub fn format_optional(n: Option<f64>, decimals: usize) -> String {
        match n {
            Some(v) if v.is_finite() => format_number(v, decimals),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    /// Thousands-separated integer, used for row counts in log lines.
    pub fn format_int<T>(n: T) -> String
    where
        T: ToFormattedString,
    {
        n.to_formatted_string(&Locale::en)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_number() {
            assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
            assert_eq!(format_number(18414.0, 0), "18,414");
            assert_eq!(format_number(-2.5, 1), "-2.5");
            assert_eq!(format_number(-0.01, 1), "0.0");
        }

        #[test]
        fn test_format_optional() {
            assert_eq!(format_optional(Some(4.5), 2), "4.50");
            assert_eq!(format_optional(None, 2), "n/a");
            assert_eq!(format_optional(Some(f64::NAN), 2), "n/a");
        }

        #[test]
        fn test_format_int() {
            assert_eq!(format_int(9855usize), "9,855");
        }
    }
}
