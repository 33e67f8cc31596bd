//! Fetch-OHLCV example
//!
//! Asks an exchange for the first three one-minute BTC/USDT candles of the
//! last 24 hours and prints how many came back and the last close.
//! Failures from the exchange are not handled here; they propagate to the
//! caller.

use anyhow::{Context, Result};
use serde_json::json;
use std::io::Write;

use crate::exchange::{Exchange, Ohlcv, Params};

pub const SYMBOL: &str = "BTC/USDT";
pub const TIMEFRAME: &str = "1m";
pub const LIMIT: u32 = 3;

/// 24 hours in milliseconds
pub const LOOKBACK_MS: i64 = 86_400 * 1000;

/// Extra options handed to the exchange untouched
pub fn options() -> Params {
    let mut params = Params::new();
    params.insert("whatever".to_string(), json!(123));
    params
}

/// One-line summary of a fetch
pub fn summarize(exchange_id: &str, candles: &[Ohlcv]) -> String {
    match candles.last() {
        Some(last) => format!(
            "Fetched {} candles for {}:  last close {}",
            candles.len(),
            exchange_id,
            last.close
        ),
        None => "No candles have been fetched".to_string(),
    }
}

/// Run the example against `exchange`, writing the summary line to `out`
pub async fn run<E, W>(exchange: &E, out: &mut W) -> Result<()>
where
    E: Exchange,
    W: Write,
{
    let since = exchange.milliseconds() - LOOKBACK_MS;

    let candles = exchange
        .fetch_ohlcv(SYMBOL, TIMEFRAME, Some(since), Some(LIMIT), &options())
        .await
        .with_context(|| format!("Failed to fetch {} {} candles from {}", SYMBOL, TIMEFRAME, exchange.name()))?;

    writeln!(out, "{}", summarize(exchange.id(), &candles))?;
    Ok(())
}
