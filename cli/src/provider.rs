//! Market-data provider client.
//!
//! Thin wrapper over the Yahoo Finance v8 chart endpoint: one GET per
//! (ticker, period) pair returns daily closes plus the listing's short name.
//! Failures are surfaced to the caller as [`FetchError`] and never retried
//! within a computation.

use crate::error::FetchError;
use crate::models::{Period, PricePoint, PriceSeries, TickerHistory};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, SystemTime};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
];

pub struct YahooClient {
    client: Client,
    base_url: String,
    rate_limit_per_minute: u32,
    request_timestamps: Vec<SystemTime>,
    random_agent: bool,
}

impl YahooClient {
    pub fn new(random_agent: bool, rate_limit_per_minute: u32) -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL, random_agent, rate_limit_per_minute)
    }

    /// Build a client against a non-default endpoint (test servers, proxies).
    pub fn with_base_url(
        base_url: impl Into<String>,
        random_agent: bool,
        rate_limit_per_minute: u32,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(YahooClient {
            client,
            base_url: base_url.into(),
            rate_limit_per_minute,
            request_timestamps: Vec::new(),
            random_agent,
        })
    }

    fn user_agent(&self) -> &'static str {
        if self.random_agent {
            use rand::seq::IndexedRandom;
            USER_AGENTS
                .choose(&mut rand::rng())
                .copied()
                .unwrap_or(USER_AGENTS[0])
        } else {
            USER_AGENTS[0]
        }
    }

    async fn enforce_rate_limit(&mut self) {
        let current_time = SystemTime::now();

        // Keep only timestamps from the last minute
        self.request_timestamps.retain(|&timestamp| {
            current_time
                .duration_since(timestamp)
                .unwrap_or(Duration::from_secs(0))
                < Duration::from_secs(60)
        });

        if self.request_timestamps.len() >= self.rate_limit_per_minute as usize {
            if let Some(&oldest_request) = self.request_timestamps.first() {
                let elapsed = current_time
                    .duration_since(oldest_request)
                    .unwrap_or(Duration::from_secs(0));
                let wait_time = Duration::from_secs(60).saturating_sub(elapsed);
                if !wait_time.is_zero() {
                    debug!(wait_ms = wait_time.as_millis(), "Rate limit reached, waiting");
                    sleep(wait_time + Duration::from_millis(100)).await;
                }
            }
        }

        self.request_timestamps.push(current_time);
    }

    /// Fetch daily closing-price history for one ticker over the given
    /// lookback period, along with the provider's short display name when it
    /// offers one.
    #[instrument(skip(self))]
    pub async fn fetch_history(
        &mut self,
        symbol: &str,
        period: Period,
    ) -> Result<TickerHistory, FetchError> {
        self.enforce_rate_limit().await;

        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url,
            symbol,
            period.as_str()
        );
        debug!(%url, "Requesting price history");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json, text/plain, */*")
            .header("User-Agent", self.user_agent())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // The provider reports unknown symbols as a 404 with a structured
        // error body; everything else non-2xx is an upstream failure.
        if status == StatusCode::NOT_FOUND {
            warn!(symbol, "Provider does not recognize ticker");
            return Err(FetchError::NotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(upstream_failure(status));
        }

        parse_chart_response(symbol, &body)
    }
}

/// Map a non-2xx, non-404 upstream status to an error kind: server errors
/// and throttling are availability failures, anything else means we sent a
/// request the provider could not use.
fn upstream_failure(status: StatusCode) -> FetchError {
    let message = format!("provider responded with HTTP {status}");
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        FetchError::Provider(message)
    } else {
        FetchError::InvalidResponse(message)
    }
}

// --- Chart payload shape ---

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "shortName")]
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

/// Decode a chart response body into a price series. Rows with missing or
/// non-positive closes are skipped; an empty result maps to `NotFound`.
fn parse_chart_response(symbol: &str, body: &str) -> Result<TickerHistory, FetchError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| FetchError::InvalidResponse(format!("malformed chart payload: {e}")))?;

    if let Some(error) = envelope.chart.error {
        warn!(symbol, code = %error.code, description = %error.description, "Provider error body");
        return Err(FetchError::NotFound {
            symbol: symbol.to_string(),
        });
    }

    let result = envelope
        .chart
        .result
        .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
        .ok_or_else(|| FetchError::NotFound {
            symbol: symbol.to_string(),
        })?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .first()
        .and_then(|q| q.close.clone())
        .unwrap_or_default();

    if closes.len() != timestamps.len() {
        return Err(FetchError::InvalidResponse(format!(
            "timestamp/close length mismatch ({} vs {})",
            timestamps.len(),
            closes.len()
        )));
    }

    let mut points = Vec::with_capacity(timestamps.len());
    for (&ts, close) in timestamps.iter().zip(&closes) {
        let Some(close) = *close else {
            continue; // untraded day, provider fills with null
        };
        if !close.is_finite() || close <= 0.0 {
            continue;
        }
        let Some(time) = DateTime::<Utc>::from_timestamp(ts, 0) else {
            return Err(FetchError::InvalidResponse(format!(
                "timestamp {ts} is out of range"
            )));
        };
        points.push(PricePoint {
            date: time.date_naive(),
            close,
        });
    }

    if points.is_empty() {
        debug!(symbol, "Provider returned an empty history");
        return Err(FetchError::NotFound {
            symbol: symbol.to_string(),
        });
    }

    Ok(TickerHistory {
        series: PriceSeries::new(symbol, points),
        short_name: result.meta.short_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn client_creation_succeeds() {
        assert!(YahooClient::new(true, 30).is_ok());
        assert!(YahooClient::with_base_url("http://127.0.0.1:1", false, 6).is_ok());
    }

    fn chart_body(short_name: Option<&str>, rows: &[(i64, Option<f64>)]) -> String {
        let timestamps: Vec<i64> = rows.iter().map(|(ts, _)| *ts).collect();
        let closes: Vec<Option<f64>> = rows.iter().map(|(_, c)| *c).collect();
        serde_json::json!({
            "chart": {
                "result": [{
                    "meta": { "shortName": short_name, "currency": "JPY" },
                    "timestamp": timestamps,
                    "indicators": { "quote": [{ "close": closes }] }
                }],
                "error": null
            }
        })
        .to_string()
    }

    #[test]
    fn parses_daily_closes_and_short_name() {
        // 2024-01-02 .. 2024-01-04 at 00:00 UTC
        let body = chart_body(
            Some("Toyota Motor Corporation"),
            &[
                (1_704_153_600, Some(2890.0)),
                (1_704_240_000, Some(2905.5)),
                (1_704_326_400, Some(2871.0)),
            ],
        );
        let history = parse_chart_response("7203.T", &body).unwrap();

        assert_eq!(history.series.symbol, "7203.T");
        assert_eq!(history.series.len(), 3);
        assert_eq!(history.series.points[1].close, 2905.5);
        assert_eq!(
            history.series.points[0].date.to_string(),
            "2024-01-02"
        );
        assert_eq!(history.display_name(), "Toyota Motor Corporation");
    }

    #[test]
    fn null_and_nonpositive_closes_are_skipped() {
        let body = chart_body(
            None,
            &[
                (1_704_153_600, Some(100.0)),
                (1_704_240_000, None),
                (1_704_326_400, Some(0.0)),
                (1_704_412_800, Some(101.0)),
            ],
        );
        let history = parse_chart_response("X", &body).unwrap();
        assert_eq!(history.series.len(), 2);
        assert!(history.short_name.is_none());
        assert_eq!(history.display_name(), "X");
    }

    #[test]
    fn provider_error_body_maps_to_not_found() {
        let body = serde_json::json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        })
        .to_string();
        let err = parse_chart_response("NOPE", &body).unwrap_err();
        assert!(matches!(err, FetchError::NotFound { symbol } if symbol == "NOPE"));
    }

    #[test]
    fn empty_history_maps_to_not_found() {
        let body = chart_body(Some("Ghost Corp"), &[]);
        assert!(matches!(
            parse_chart_response("GHOST", &body),
            Err(FetchError::NotFound { .. })
        ));
    }

    #[test]
    fn mismatched_arrays_are_invalid() {
        let body = serde_json::json!({
            "chart": {
                "result": [{
                    "meta": {},
                    "timestamp": [1_704_153_600i64, 1_704_240_000i64],
                    "indicators": { "quote": [{ "close": [100.0] }] }
                }],
                "error": null
            }
        })
        .to_string();
        assert!(matches!(
            parse_chart_response("X", &body),
            Err(FetchError::InvalidResponse(_))
        ));
    }

    #[test]
    fn availability_failures_map_to_provider_errors() {
        assert!(matches!(
            upstream_failure(StatusCode::SERVICE_UNAVAILABLE),
            FetchError::Provider(_)
        ));
        assert!(matches!(
            upstream_failure(StatusCode::INTERNAL_SERVER_ERROR),
            FetchError::Provider(_)
        ));
        assert!(matches!(
            upstream_failure(StatusCode::TOO_MANY_REQUESTS),
            FetchError::Provider(_)
        ));
        assert!(matches!(
            upstream_failure(StatusCode::FORBIDDEN),
            FetchError::InvalidResponse(_)
        ));
    }

    #[test]
    fn garbage_payload_is_invalid() {
        assert!(matches!(
            parse_chart_response("X", "<html>rate limited</html>"),
            Err(FetchError::InvalidResponse(_))
        ));
    }
}
