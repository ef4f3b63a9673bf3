//! Binance Candle Window Aggregator
//!
//! Fetches the one-minute kline window containing the target time and
//! reduces it to per-field averages. Binance klines are positional
//! arrays; all index-based access lives in [`kline_from_row`] so a
//! schema drift fails loudly in exactly one place.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{PriceError, Result};
use crate::fetch::{decode, FetchClient};
use crate::model::WindowAverage;

const KLINES_ENDPOINT: &str = "https://api.binance.com/api/v1/klines";

/// Window length in milliseconds
const WINDOW_MS: i64 = 60_000;

pub(crate) fn klines_url(pair: &str, start_ms: i64) -> String {
    let end_ms = start_ms + WINDOW_MS;
    format!("{KLINES_ENDPOINT}?symbol={pair}&interval=1m&startTime={start_ms}&endTime={end_ms}")
}

/// The fields this engine cares about from a positional kline row
struct Kline {
    high: Decimal,
    low: Decimal,
    close: Decimal,
}

/// Kline rows index prices by position: 2 = high, 3 = low, 4 = close
fn kline_from_row(row: &[Value]) -> Result<Kline> {
    Ok(Kline {
        high: decimal_at(row, 2)?,
        low: decimal_at(row, 3)?,
        close: decimal_at(row, 4)?,
    })
}

fn decimal_at(row: &[Value], index: usize) -> Result<Decimal> {
    let value = row.get(index).ok_or_else(|| {
        PriceError::Decode(format!("kline row has {} fields, index {index} missing", row.len()))
    })?;
    serde_json::from_value(value.clone())
        .map_err(|e| PriceError::Decode(format!("kline field {index}: {e}")))
}

/// Average the one-minute candles starting at `start_ms` for `pair`
///
/// `start_ms` must already be floored to a whole minute; the resolver
/// owns that truncation.
pub async fn window_average<F: FetchClient>(
    fetch: &F,
    pair: &str,
    start_ms: i64,
) -> Result<WindowAverage> {
    let body = fetch.fetch_json(&klines_url(pair, start_ms)).await?;
    let rows: Vec<Vec<Value>> = decode(body)?;

    if rows.is_empty() {
        return Err(PriceError::DataUnavailable { pair: pair.to_string() });
    }

    let mut low = Decimal::ZERO;
    let mut high = Decimal::ZERO;
    let mut close = Decimal::ZERO;
    for row in &rows {
        let kline = kline_from_row(row)?;
        low += kline.low;
        high += kline.high;
        close += kline.close;
    }

    let count = Decimal::from(rows.len());
    Ok(WindowAverage {
        low: low / count,
        high: high / count,
        close: close / count,
    })
}
