//! Exchange capability trait and the OHLCV record it produces
//!
//! The example runner only talks to [`Exchange`], so any client (or a test
//! double) that can report the time and fetch candles can drive it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Exchange-specific request options, passed through uninterpreted by callers
pub type Params = serde_json::Map<String, serde_json::Value>;

/// One candlestick: `(timestamp, open, high, low, close, volume)`
///
/// `timestamp` is the interval's open time in Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ohlcv {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Ohlcv {
    /// Tuple position of the closing price
    pub const CLOSE: usize = 4;

    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Ohlcv {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Read a price/volume field by tuple position (1..=5)
    ///
    /// Index 0 is the timestamp and is not a float; use [`Ohlcv::timestamp`].
    pub fn value(&self, index: usize) -> Option<f64> {
        match index {
            1 => Some(self.open),
            2 => Some(self.high),
            3 => Some(self.low),
            4 => Some(self.close),
            5 => Some(self.volume),
            _ => None,
        }
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// The capabilities an exchange client exposes to the example runner
#[async_trait]
pub trait Exchange: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short identifier, e.g. `"okx"`
    fn id(&self) -> &str;

    /// Display name, e.g. `"OKX"`
    fn name(&self) -> &str;

    /// Current UTC time in milliseconds
    fn milliseconds(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Fetch candles for a unified symbol (`"BASE/QUOTE"`), oldest first
    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: &str,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> Result<Vec<Ohlcv>, Self::Error>;
}

/// Timeframe length in seconds (`"1m"` -> 60, `"1d"` -> 86400)
///
/// Units: `s`, `m`, `h`, `d`, `w`, `M` (30 days), `y` (365 days).
pub fn parse_timeframe(timeframe: &str) -> Option<i64> {
    let unit = timeframe.chars().last()?;
    let amount: i64 = timeframe[..timeframe.len() - unit.len_utf8()].parse().ok()?;
    if amount <= 0 {
        return None;
    }

    let scale = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        'w' => 7 * 24 * 60 * 60,
        'M' => 30 * 24 * 60 * 60,
        'y' => 365 * 24 * 60 * 60,
        _ => return None,
    };

    amount.checked_mul(scale)
}

/// Keep candles at or after `since`, then cap the count at `limit`
///
/// With `since` set the earliest `limit` candles are kept; without it the
/// latest. Input must be sorted oldest first.
pub fn filter_by_since_limit(
    candles: Vec<Ohlcv>,
    since: Option<i64>,
    limit: Option<u32>,
) -> Vec<Ohlcv> {
    let mut filtered: Vec<Ohlcv> = match since {
        Some(since) => candles.into_iter().filter(|c| c.timestamp >= since).collect(),
        None => candles,
    };

    if let Some(limit) = limit {
        let limit = limit as usize;
        if filtered.len() > limit {
            if since.is_some() {
                filtered.truncate(limit);
            } else {
                filtered.drain(..filtered.len() - limit);
            }
        }
    }

    filtered
}
