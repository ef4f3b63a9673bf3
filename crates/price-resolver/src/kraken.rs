//! Kraken Tick Bracketing Engine
//!
//! Pages the Kraken OHLC endpoint forward from the start of history
//! until the series advances past the target timestamp, yielding the
//! two samples that bracket it. Daily candles keep the page count low;
//! one page covers 720 days.
//!
//! The returned bracket also carries the min-low/max-high observed
//! across every sample scanned on the way, which is what the hop price
//! is computed from (see `PriceBracket::mid`).

use std::collections::HashMap;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::ResolverConfig;
use crate::error::{PriceError, Result};
use crate::fetch::{decode, FetchClient};
use crate::model::{OhlcSample, PriceBracket};

const OHLC_ENDPOINT: &str = "https://api.kraken.com/0/public/OHLC";

/// Candle granularity in minutes (one day)
const INTERVAL_MINUTES: u32 = 1440;

/// Longest backoff between retried pages
const MAX_BACKOFF: Duration = Duration::from_secs(8);

pub(crate) fn ohlc_url(pair: &str, since: i64) -> String {
    format!("{OHLC_ENDPOINT}?pair={pair}&interval={INTERVAL_MINUTES}&since={since}")
}

/// Kraken OHLC response envelope
#[derive(Debug, Deserialize)]
struct OhlcResponse {
    #[serde(default)]
    error: Vec<String>,
    result: Option<OhlcResult>,
}

#[derive(Debug, Deserialize)]
struct OhlcResult {
    /// Cursor for the next page; unused, paging advances by sample time
    #[serde(default)]
    #[allow(dead_code)]
    last: i64,
    /// One entry per requested pair, keyed by Kraken's pair spelling
    #[serde(flatten)]
    pairs: HashMap<String, Vec<OhlcRow>>,
}

/// One OHLC row: [time, open, high, low, close, vwap, volume, count].
/// Kraken quotes prices as JSON strings; `Decimal` decodes both.
#[derive(Debug, Deserialize)]
#[allow(dead_code)] // vwap, volume and count are decoded for arity only
struct OhlcRow(i64, Decimal, Decimal, Decimal, Decimal, Decimal, Decimal, u64);

impl From<&OhlcRow> for OhlcSample {
    fn from(row: &OhlcRow) -> Self {
        Self {
            time: row.0,
            open: row.1,
            high: row.2,
            low: row.3,
            close: row.4,
        }
    }
}

/// Bracket discovery over the paged OHLC series
pub struct TickBracketer<'a, F: FetchClient> {
    fetch: &'a F,
    max_pages: u32,
    empty_retries: u32,
    page_delay: Duration,
}

impl<'a, F: FetchClient> TickBracketer<'a, F> {
    pub fn new(fetch: &'a F, config: &ResolverConfig) -> Self {
        Self {
            fetch,
            max_pages: config.max_pages,
            empty_retries: config.empty_retries,
            page_delay: config.page_delay,
        }
    }

    /// Find the samples bracketing `target` (epoch seconds) for `pair`
    ///
    /// Pages forward from `since = 0`, advancing the cursor to each
    /// at-or-before sample. Empty or error responses are retried with
    /// exponential backoff up to the retry limit; the whole search is
    /// bounded by the page limit.
    pub async fn bracket(&self, pair: &str, target: i64) -> Result<PriceBracket> {
        let mut since = 0i64;
        let mut before: Option<OhlcSample> = None;
        let mut low: Option<Decimal> = None;
        let mut high: Option<Decimal> = None;
        let mut empty_pages = 0u32;

        for page in 0..self.max_pages {
            if page > 0 {
                sleep(backoff(self.page_delay, empty_pages)).await;
            }

            let body = self.fetch.fetch_json(&ohlc_url(pair, since)).await?;
            let response: OhlcResponse = decode(body)?;

            let result = match response.result {
                Some(result) if response.error.is_empty() => result,
                _ => {
                    empty_pages += 1;
                    warn!(pair, page, errors = ?response.error, "empty OHLC result");
                    if empty_pages > self.empty_retries {
                        return Err(PriceError::DataUnavailable { pair: pair.to_string() });
                    }
                    continue;
                }
            };
            empty_pages = 0;

            let mut after: Option<OhlcSample> = None;
            for row in result.pairs.values().flatten() {
                let sample = OhlcSample::from(row);
                low = Some(low.map_or(sample.low, |l| l.min(sample.low)));
                high = Some(high.map_or(sample.high, |h| h.max(sample.high)));

                if sample.time > target {
                    after = Some(sample);
                    break;
                }
                since = sample.time;
                before = Some(sample);
            }

            if let Some(after) = after {
                let before = before.ok_or_else(|| PriceError::MissingHistory {
                    pair: pair.to_string(),
                    target,
                })?;
                let (Some(low), Some(high)) = (low, high) else {
                    return Err(PriceError::MissingHistory {
                        pair: pair.to_string(),
                        target,
                    });
                };
                debug!(pair, before = before.time, after = after.time, "bracket found");
                return Ok(PriceBracket { before, after, low, high });
            }
        }

        Err(PriceError::BracketNotFound {
            pair: pair.to_string(),
            pages: self.max_pages,
        })
    }
}

fn backoff(base: Duration, empty_pages: u32) -> Duration {
    base.saturating_mul(1 << empty_pages.min(5)).min(MAX_BACKOFF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetchClient;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};

    fn row(time: i64, high: &str, low: &str) -> Value {
        json!([time, "10.0", high, low, "9.5", "9.7", "120.4", 42])
    }

    fn page(pair: &str, rows: Vec<Value>, last: i64) -> Value {
        json!({ "error": [], "result": { pair: rows, "last": last } })
    }

    async fn bracket_with(
        mock: &MockFetchClient,
        pair: &str,
        target: i64,
    ) -> Result<PriceBracket> {
        let config = ResolverConfig::immediate();
        TickBracketer::new(mock, &config).bracket(pair, target).await
    }

    #[tokio::test]
    async fn test_bracket_within_single_page() {
        let mock = MockFetchClient::new().with_response(
            ohlc_url("XBTUSD", 0),
            page(
                "XBTUSD",
                vec![row(100, "11", "9"), row(200, "12", "8"), row(300, "13", "7")],
                300,
            ),
        );

        let bracket = bracket_with(&mock, "XBTUSD", 250).await.unwrap();
        assert_eq!(bracket.before.time, 200);
        assert_eq!(bracket.after.time, 300);
        // Extremes come from the whole scanned window, not just the
        // two bracketing samples. Inherited behavior, pinned on purpose.
        assert_eq!(bracket.low, dec!(7));
        assert_eq!(bracket.high, dec!(13));
        assert_eq!(bracket.mid(), dec!(10));
    }

    #[tokio::test]
    async fn test_cursor_advances_across_pages() {
        let mock = MockFetchClient::new()
            .with_response(
                ohlc_url("XBTUSD", 0),
                page("XBTUSD", vec![row(100, "11", "9"), row(200, "12", "8")], 200),
            )
            .with_response(
                ohlc_url("XBTUSD", 200),
                page("XBTUSD", vec![row(300, "13", "7")], 300),
            );

        let bracket = bracket_with(&mock, "XBTUSD", 250).await.unwrap();
        assert_eq!(bracket.before.time, 200);
        assert_eq!(bracket.after.time, 300);
        assert_eq!(bracket.low, dec!(7));
        assert_eq!(bracket.high, dec!(13));
        assert_eq!(
            mock.calls(),
            vec![ohlc_url("XBTUSD", 0), ohlc_url("XBTUSD", 200)]
        );
    }

    #[tokio::test]
    async fn test_history_starting_after_target() {
        let mock = MockFetchClient::new().with_response(
            ohlc_url("XBTUSD", 0),
            page("XBTUSD", vec![row(300, "13", "7")], 300),
        );

        let err = bracket_with(&mock, "XBTUSD", 250).await.unwrap_err();
        assert!(matches!(err, PriceError::MissingHistory { .. }));
    }

    #[tokio::test]
    async fn test_null_result_surfaces_data_unavailable() {
        let mock = MockFetchClient::new()
            .with_response(ohlc_url("XBTUSD", 0), json!({ "error": [], "result": null }));

        let err = bracket_with(&mock, "XBTUSD", 250).await.unwrap_err();
        assert!(matches!(err, PriceError::DataUnavailable { .. }));
        // First attempt plus the configured retries, all against the
        // same cursor.
        let retries = ResolverConfig::default().empty_retries as usize;
        assert_eq!(mock.calls().len(), retries + 1);
    }

    #[tokio::test]
    async fn test_error_payload_treated_as_unavailable() {
        let mock = MockFetchClient::new().with_response(
            ohlc_url("XBTUSD", 0),
            json!({ "error": ["EQuery:Unknown asset pair"], "result": null }),
        );

        let err = bracket_with(&mock, "XBTUSD", 250).await.unwrap_err();
        assert!(matches!(err, PriceError::DataUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_page_bound_yields_bracket_not_found() {
        // Every page repeats the same stale sample, so the cursor
        // never advances past the target.
        let mut mock = MockFetchClient::new().with_response(
            ohlc_url("XBTUSD", 0),
            page("XBTUSD", vec![row(100, "11", "9")], 100),
        );
        mock = mock.with_response(
            ohlc_url("XBTUSD", 100),
            page("XBTUSD", vec![row(100, "11", "9")], 100),
        );

        let mut config = ResolverConfig::immediate();
        config.max_pages = 5;
        let err = TickBracketer::new(&mock, &config)
            .bracket("XBTUSD", 250)
            .await
            .unwrap_err();
        assert!(matches!(err, PriceError::BracketNotFound { pages: 5, .. }));
        assert_eq!(mock.calls().len(), 5);
    }

    #[tokio::test]
    async fn test_string_priced_rows_decode() {
        let mock = MockFetchClient::new().with_response(
            ohlc_url("XBTEUR", 0),
            json!({
                "error": [],
                "result": {
                    "XBTEUR": [
                        [100, "9123.4", "9200.1", "9050.9", "9180.0", "9140.2", "512.8", 1043],
                        [200, "9180.0", "9300.5", "9100.0", "9250.3", "9210.7", "611.2", 1187]
                    ],
                    "last": 200
                }
            }),
        );

        let bracket = bracket_with(&mock, "XBTEUR", 150).await.unwrap();
        assert_eq!(bracket.before.time, 100);
        assert_eq!(bracket.after.time, 200);
        assert_eq!(bracket.low, dec!(9050.9));
        assert_eq!(bracket.high, dec!(9300.5));
    }
}
