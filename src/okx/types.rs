//! OKX API types for candlestick data

use serde::Deserialize;
use serde_json::Value;

use crate::exchange::{parse_timeframe, Ohlcv};
use super::error::{OkxError, OkxResult};

/// Response envelope shared by all v5 REST endpoints
#[derive(Debug, Deserialize)]
pub struct OkxResponse {
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

impl OkxResponse {
    /// Return the data rows, or the mapped error when `code` is not `"0"`
    pub fn into_data(self) -> OkxResult<Vec<Vec<Value>>> {
        if self.code == "0" {
            Ok(self.data)
        } else {
            Err(OkxError::from_code(&self.code, &self.msg))
        }
    }
}

/// Parse one candle row
///
/// OKX returns `[ts, o, h, l, c, vol, volCcy, volCcyQuote, confirm]`, every
/// field as a string. Only the first six are needed.
pub fn parse_candle(raw: &[Value]) -> Option<Ohlcv> {
    if raw.len() < 6 {
        return None;
    }

    Some(Ohlcv {
        timestamp: as_i64(&raw[0])?,
        open: as_f64(&raw[1])?,
        high: as_f64(&raw[2])?,
        low: as_f64(&raw[3])?,
        close: as_f64(&raw[4])?,
        volume: as_f64(&raw[5])?,
    })
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

/// Which candles endpoint serves a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandlesEndpoint {
    /// `market/candles`: recent data, up to 300 per request
    Recent,
    /// `market/history-candles`: older data, up to 100 per request
    History,
}

impl CandlesEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            CandlesEndpoint::Recent => "market/candles",
            CandlesEndpoint::History => "market/history-candles",
        }
    }

    pub fn max_limit(&self) -> u32 {
        match self {
            CandlesEndpoint::Recent => 300,
            CandlesEndpoint::History => 100,
        }
    }

    /// Resolve a `method` override from request params
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "publicGetMarketCandles" => Some(CandlesEndpoint::Recent),
            "publicGetMarketHistoryCandles" => Some(CandlesEndpoint::History),
            _ => None,
        }
    }
}

/// Default candles per request when the caller gives no limit
pub const DEFAULT_LIMIT: u32 = 100;

/// Supported timeframes and their OKX `bar` names
pub const TIMEFRAMES: &[(&str, &str)] = &[
    ("1m", "1m"),
    ("3m", "3m"),
    ("5m", "5m"),
    ("15m", "15m"),
    ("30m", "30m"),
    ("1h", "1H"),
    ("2h", "2H"),
    ("4h", "4H"),
    ("6h", "6H"),
    ("12h", "12H"),
    ("1d", "1D"),
    ("1w", "1W"),
    ("1M", "1M"),
    ("3M", "3M"),
];

/// OKX `bar` for a timeframe; bars of 6h and longer use the UTC-aligned variant
pub fn to_okx_bar(timeframe: &str) -> OkxResult<String> {
    let bar = TIMEFRAMES
        .iter()
        .find(|(tf, _)| *tf == timeframe)
        .map(|(_, bar)| *bar)
        .ok_or_else(|| OkxError::BadRequest(format!("Unsupported timeframe: {}", timeframe)))?;

    let duration = parse_timeframe(timeframe).unwrap_or(0);
    if duration >= 6 * 60 * 60 {
        Ok(format!("{}utc", bar))
    } else {
        Ok(bar.to_string())
    }
}

/// Unified `BASE/QUOTE` symbol to OKX instrument id (`BTC/USDT` -> `BTC-USDT`)
pub fn to_inst_id(symbol: &str) -> OkxResult<String> {
    let mut parts = symbol.trim().split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(base), Some(quote), None) if !base.is_empty() && !quote.is_empty() => {
            Ok(format!("{}-{}", base.to_uppercase(), quote.to_uppercase()))
        }
        _ => Err(OkxError::BadSymbol(format!(
            "Expected BASE/QUOTE, got {:?}",
            symbol
        ))),
    }
}
