// =============================================================================
// Yahoo Finance chart client — daily OHLCV history
// =============================================================================
//
// GET /v8/finance/chart/{symbol}?range={period}&interval=1d
//
// The chart payload is column-oriented: one `timestamp` array plus parallel
// `open`/`high`/`low`/`close`/`volume` arrays under `indicators.quote[0]`.
// Any entry may be `null` (halted sessions); such rows are skipped.
// =============================================================================

use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::provider::{FetchError, FetchResult, MarketDataProvider};
use super::{Bar, PriceSeries};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Per-request timeout applied by the HTTP client itself.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Yahoo Finance chart API client.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different host (mirrors, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) StockHighlights/1.0")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build reqwest client for YahooClient")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn chart_url(&self, symbol: &str, period: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url, symbol, period
        )
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for YahooClient {
    #[instrument(skip(self), name = "yahoo::fetch")]
    async fn fetch(&self, symbol: &str, period: &str) -> FetchResult {
        let url = self.chart_url(symbol, period);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| FetchError::Parse(format!("chart response is not JSON: {e}")))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.to_string(),
            });
        }

        let series = parse_chart(symbol, &body)?;
        debug!(symbol, period, bars = series.len(), "chart fetched");
        Ok(series)
    }
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Payload parsing
// ---------------------------------------------------------------------------

/// Convert a chart payload into a normalised [`PriceSeries`].
///
/// An empty result is reported as [`FetchError::Empty`] so the caller sees a
/// single "no data" shape regardless of why Yahoo had nothing.
pub fn parse_chart(symbol: &str, body: &Value) -> FetchResult {
    let chart = &body["chart"];

    if let Some(err) = chart.get("error").filter(|e| !e.is_null()) {
        let description = err["description"].as_str().unwrap_or("unknown chart error");
        return Err(FetchError::Parse(description.to_string()));
    }

    let result = chart["result"]
        .as_array()
        .and_then(|arr| arr.first())
        .ok_or_else(|| FetchError::Parse("missing chart.result[0]".into()))?;

    let timestamps = match result["timestamp"].as_array() {
        Some(ts) => ts,
        // Yahoo omits the array entirely for symbols with no sessions.
        None => return Err(FetchError::Empty),
    };

    let quote = &result["indicators"]["quote"][0];
    let opens = quote_column(quote, "open")?;
    let highs = quote_column(quote, "high")?;
    let lows = quote_column(quote, "low")?;
    let closes = quote_column(quote, "close")?;
    let volumes = quote["volume"].as_array();

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, ts) in timestamps.iter().enumerate() {
        let Some(date) = ts.as_i64().and_then(date_from_unix) else {
            skipped += 1;
            continue;
        };

        let field = |col: &Vec<Value>| col.get(i).and_then(Value::as_f64);
        let (Some(open), Some(close)) = (field(opens), field(closes)) else {
            skipped += 1;
            continue;
        };
        let high = field(highs).unwrap_or(open.max(close));
        let low = field(lows).unwrap_or(open.min(close));
        let volume = volumes
            .and_then(|v| v.get(i))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        bars.push(Bar::new(date, open, high, low, close, volume));
    }

    if skipped > 0 {
        warn!(symbol, skipped, "skipping incomplete chart rows");
    }

    let series = PriceSeries::new(symbol, bars);
    if series.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(series)
}

fn quote_column<'a>(quote: &'a Value, name: &str) -> Result<&'a Vec<Value>, FetchError> {
    quote[name]
        .as_array()
        .ok_or_else(|| FetchError::Parse(format!("missing quote column '{name}'")))
}

fn date_from_unix(secs: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_url_uses_daily_interval() {
        let client = YahooClient::with_base_url("https://example.test/").unwrap();
        assert_eq!(
            client.chart_url("RY.TO", "1mo"),
            "https://example.test/v8/finance/chart/RY.TO?range=1mo&interval=1d"
        );
    }

    #[test]
    fn parse_chart_ok() {
        let json = serde_json::json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "AAPL" },
                    "timestamp": [1709251200, 1709510400, 1709596800],
                    "indicators": {
                        "quote": [{
                            "open":   [179.5, 176.1, 170.7],
                            "high":   [180.5, 176.9, 172.0],
                            "low":    [177.4, 173.8, 170.1],
                            "close":  [179.6, 175.1, 170.1],
                            "volume": [73488000, 81510100, 95132400]
                        }]
                    }
                }],
                "error": null
            }
        });

        let series = parse_chart("AAPL", &json).expect("should parse");
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.len(), 3);
        assert_eq!(series.first().unwrap().date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!((series.last().unwrap().close - 170.1).abs() < f64::EPSILON);
        assert!((series.last().unwrap().volume - 95_132_400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_chart_skips_null_rows() {
        let json = serde_json::json!({
            "chart": {
                "result": [{
                    "timestamp": [1709251200, 1709510400],
                    "indicators": {
                        "quote": [{
                            "open":  [10.0, null],
                            "high":  [11.0, null],
                            "low":   [9.0, null],
                            "close": [10.5, null],
                            "volume": [100, null]
                        }]
                    }
                }],
                "error": null
            }
        });

        let series = parse_chart("X", &json).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn parse_chart_without_timestamps_is_empty() {
        let json = serde_json::json!({
            "chart": {
                "result": [{ "meta": {}, "indicators": { "quote": [{}] } }],
                "error": null
            }
        });
        assert_eq!(parse_chart("NONE", &json), Err(FetchError::Empty));
    }

    #[test]
    fn parse_chart_reports_provider_error() {
        let json = serde_json::json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        });
        match parse_chart("GONE", &json) {
            Err(FetchError::Parse(msg)) => assert!(msg.contains("delisted")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
