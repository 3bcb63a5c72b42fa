//! NASA POWER daily point client.
//!
//! One range query per run. The response nests values by parameter code and
//! then by `YYYYMMDD` date:
//!
//! ```text
//! {"properties": {"parameter": {"ALLSKY_SFC_SW_DWN": {"20230501": 5.12, ...}, ...}}}
//! ```
//!
//! Any transport failure, non-2xx status or unexpected payload shape is a
//! fatal [`PvaError::SourceUnavailable`]; there is no retry.

use crate::{
    climate::{ClimateParameter, ClimateRecord},
    error::{PvaError, Result},
};
use chrono::NaiveDate;
use log::{debug, info, warn};
use pva_utils::dates::{format_date_compact, parse_date_compact};
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Production host of the NASA POWER API.
pub const POWER_BASE_URL: &str = "https://power.larc.nasa.gov";

/// Path of the daily point endpoint.
pub const DAILY_POINT_PATH: &str = "/api/temporal/daily/point";

/// Default user community; `RE` (renewable energy) selects kWh/m²/day units.
pub const DEFAULT_COMMUNITY: &str = "RE";

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: BTreeMap<String, BTreeMap<String, Option<f64>>>,
}

/// Location and period of one daily range query.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub community: String,
}

impl PowerQuery {
    /// Query arguments in the order the API documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start", format_date_compact(&self.start)),
            ("end", format_date_compact(&self.end)),
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("parameters", ClimateParameter::query_list()),
            ("format", "JSON".to_string()),
            ("community", self.community.clone()),
        ]
    }
}

/// Thin wrapper over a reqwest client bound to one POWER host.
#[derive(Debug, Clone)]
pub struct PowerClient {
    client: Client,
    base_url: String,
}

impl PowerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<PowerClient> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PvaError::SourceUnavailable {
                endpoint: format!("{}{}", base_url, DAILY_POINT_PATH),
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(PowerClient { client, base_url })
    }

    /// Full URL of the daily point endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, DAILY_POINT_PATH)
    }

    /// Fetch and reshape daily climate records for the query period.
    pub async fn fetch_daily(&self, query: &PowerQuery) -> Result<Vec<ClimateRecord>> {
        let endpoint = self.endpoint();
        let unavailable = |reason: String| PvaError::SourceUnavailable {
            endpoint: endpoint.clone(),
            reason,
        };

        info!(
            "Requesting NASA POWER daily data for ({}, {}) from {} to {}",
            query.latitude, query.longitude, query.start, query.end
        );

        let response = self
            .client
            .get(&endpoint)
            .query(&query.query_pairs())
            .send()
            .await
            .map_err(|e| unavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| unavailable(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            return Err(unavailable(format!("HTTP {}: {}", status, snippet.trim())));
        }

        let records = parse_daily_response(&body).map_err(|e| unavailable(e.to_string()))?;
        match (records.first(), records.last()) {
            (Some(first), Some(last)) => info!(
                "Received {} climate days ({} to {})",
                records.len(),
                first.date,
                last.date
            ),
            _ => debug!("NASA POWER returned no climate days"),
        }
        Ok(records)
    }
}

/// Reshape a POWER JSON body into one [`ClimateRecord`] per date, ascending.
///
/// Sentinels are kept as delivered. Parameters other than the five
/// requested ones are ignored; a requested parameter missing from the
/// payload leaves that field `None` on every record. A payload carrying
/// none of the requested parameters, or no dated value at all, is
/// malformed.
pub fn parse_daily_response(body: &str) -> Result<Vec<ClimateRecord>> {
    let response: PowerResponse =
        serde_json::from_str(body).map_err(|e| PvaError::MalformedPayload(e.to_string()))?;

    let mut by_date: BTreeMap<NaiveDate, ClimateRecord> = BTreeMap::new();
    let mut seen: BTreeSet<ClimateParameter> = BTreeSet::new();

    for (code, series) in &response.properties.parameter {
        let Some(param) = ClimateParameter::from_code(code) else {
            debug!("Ignoring unrequested parameter {}", code);
            continue;
        };
        seen.insert(param);
        for (date_key, value) in series {
            let date = parse_date_compact(date_key).map_err(|_| {
                PvaError::MalformedPayload(format!("bad date key '{}' under {}", date_key, code))
            })?;
            by_date
                .entry(date)
                .or_insert_with(|| ClimateRecord::empty(date))
                .set(param, *value);
        }
    }

    if seen.is_empty() {
        return Err(PvaError::MalformedPayload(format!(
            "none of the requested parameters ({}) in payload",
            ClimateParameter::query_list()
        )));
    }
    if by_date.is_empty() {
        return Err(PvaError::MalformedPayload(
            "payload has no dated values".to_string(),
        ));
    }

    for param in ClimateParameter::ALL {
        if !seen.contains(&param) {
            warn!("Parameter {} missing from NASA POWER payload", param.code());
        }
    }

    Ok(by_date.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const BODY: &str = r#"{
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [-75.8886, 8.7563, 21.4]},
        "properties": {"parameter": {
            "ALLSKY_SFC_SW_DWN": {"20230501": 5.0, "20230502": 4.0, "20230503": -999.0},
            "T2M_MAX": {"20230501": 33.1, "20230502": 32.4, "20230503": 31.9},
            "T2M_MIN": {"20230501": 23.0, "20230502": 22.8, "20230503": 23.4},
            "CLOUD_AMT": {"20230501": 81.2, "20230502": 90.5, "20230503": 95.0},
            "PRECTOTCORR": {"20230501": 0.0, "20230502": 12.3, "20230503": 4.1}
        }},
        "header": {"fill_value": -999.0}
    }"#;

    fn may(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, day).unwrap()
    }

    fn query() -> PowerQuery {
        PowerQuery {
            start: may(1),
            end: may(3),
            latitude: 8.7563,
            longitude: -75.8886,
            community: DEFAULT_COMMUNITY.to_string(),
        }
    }

    #[test]
    fn test_parse_daily_response() {
        let records = parse_daily_response(BODY).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, may(1));
        assert_eq!(records[0].solar_irradiance, Some(5.0));
        assert_eq!(records[1].precipitation, Some(12.3));
        assert_eq!(records[1].cloud_fraction, Some(90.5));
        // sentinels are not scrubbed at this stage
        assert_eq!(records[2].solar_irradiance, Some(-999.0));
    }

    #[test]
    fn test_parse_missing_parameter_leaves_none() {
        let body = r#"{"properties": {"parameter": {
            "T2M_MAX": {"20230502": 30.0, "20230501": 31.0},
            "WS10M": {"20230501": 2.0}
        }}}"#;
        let records = parse_daily_response(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, may(1));
        assert_eq!(records[0].temp_max, Some(31.0));
        assert_eq!(records[0].solar_irradiance, None);
    }

    #[test]
    fn test_parse_malformed_payloads() {
        assert!(matches!(
            parse_daily_response(r#"{"messages": ["oops"]}"#),
            Err(PvaError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_daily_response(r#"{"properties": {"parameter": {"T2M_MAX": {"2023-05-01": 1.0}}}}"#),
            Err(PvaError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_daily_response(r#"{"properties": {"parameter": {"T2M_MAX": {"20230501": "hot"}}}}"#),
            Err(PvaError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_parse_payload_without_requested_parameters() {
        for body in [
            r#"{"properties": {"parameter": {}}}"#,
            r#"{"properties": {"parameter": {"WS10M": {"20230501": 2.0}}}}"#,
            r#"{"properties": {"parameter": {"T2M_MAX": {}, "T2M_MIN": {}}}}"#,
        ] {
            assert!(
                matches!(parse_daily_response(body), Err(PvaError::MalformedPayload(_))),
                "accepted {}",
                body
            );
        }
    }

    #[tokio::test]
    async fn test_fetch_daily_empty_parameters_is_fatal() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", DAILY_POINT_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"properties": {"parameter": {}}}"#)
            .create_async()
            .await;

        let client = PowerClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let result = client.fetch_daily(&query()).await;
        assert!(matches!(result, Err(PvaError::SourceUnavailable { .. })));
    }

    #[test]
    fn test_query_pairs() {
        let pairs = query().query_pairs();
        assert_eq!(pairs[0], ("start", "20230501".to_string()));
        assert_eq!(pairs[1], ("end", "20230503".to_string()));
        assert_eq!(pairs[4].1, "ALLSKY_SFC_SW_DWN,T2M_MAX,T2M_MIN,CLOUD_AMT,PRECTOTCORR");
        assert_eq!(pairs[5], ("format", "JSON".to_string()));
        assert_eq!(pairs[6], ("community", "RE".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_daily_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", DAILY_POINT_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start".into(), "20230501".into()),
                Matcher::UrlEncoded("end".into(), "20230503".into()),
                Matcher::UrlEncoded("format".into(), "JSON".into()),
                Matcher::UrlEncoded("community".into(), "RE".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;

        let client = PowerClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let records = client.fetch_daily(&query()).await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].solar_irradiance, Some(4.0));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_daily_error_status_is_fatal() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", DAILY_POINT_PATH)
            .match_query(Matcher::Any)
            .with_status(422)
            .with_body(r#"{"messages": ["start date is after end date"]}"#)
            .create_async()
            .await;

        let client = PowerClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let result = client.fetch_daily(&query()).await;

        match result {
            Err(PvaError::SourceUnavailable { endpoint, reason }) => {
                assert!(endpoint.ends_with(DAILY_POINT_PATH));
                assert!(reason.contains("422"));
            }
            other => panic!("expected SourceUnavailable, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_daily_malformed_body_is_fatal() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", DAILY_POINT_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = PowerClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let result = client.fetch_daily(&query()).await;
        assert!(matches!(result, Err(PvaError::SourceUnavailable { .. })));
    }
}
