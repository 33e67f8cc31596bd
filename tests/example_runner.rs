//! Integration tests for the fetch-OHLCV example
//!
//! The runner is driven by a scripted exchange that records every call, so
//! nothing here touches the network.

use std::sync::Mutex;

use approx::assert_relative_eq;
use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use okx_ohlcv_example::example::{self, LIMIT, LOOKBACK_MS, SYMBOL, TIMEFRAME};
use okx_ohlcv_example::{Exchange, Ohlcv, Params};

// =============================================================================
// Test Utilities
// =============================================================================

const NOW: i64 = 1_700_000_000_000;

#[derive(Debug, Error)]
#[error("mock exchange failure: {0}")]
struct MockError(String);

#[derive(Debug, Clone)]
struct Call {
    symbol: String,
    timeframe: String,
    since: Option<i64>,
    limit: Option<u32>,
    params: Params,
}

struct MockExchange {
    now: i64,
    response: Result<Vec<Ohlcv>, String>,
    calls: Mutex<Vec<Call>>,
}

impl MockExchange {
    fn returning(candles: Vec<Ohlcv>) -> Self {
        MockExchange {
            now: NOW,
            response: Ok(candles),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(msg: &str) -> Self {
        MockExchange {
            now: NOW,
            response: Err(msg.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Exchange for MockExchange {
    type Error = MockError;

    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock"
    }

    fn milliseconds(&self) -> i64 {
        self.now
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: &str,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> Result<Vec<Ohlcv>, MockError> {
        self.calls.lock().unwrap().push(Call {
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            since,
            limit,
            params: params.clone(),
        });
        self.response.clone().map_err(MockError)
    }
}

/// Generate one-minute candles starting at `start` with closes 100, 101, ...
fn generate_candles(count: usize, start: i64) -> Vec<Ohlcv> {
    (0..count)
        .map(|i| {
            let close = 100.0 + i as f64;
            Ohlcv::new(start + i as i64 * 60_000, close - 0.5, close + 1.0, close - 1.0, close, 10.0)
        })
        .collect()
}

async fn run_to_string(exchange: &MockExchange) -> anyhow::Result<String> {
    let mut out = Vec::new();
    example::run(exchange, &mut out).await?;
    Ok(String::from_utf8(out).expect("runner writes UTF-8"))
}

// =============================================================================
// Output
// =============================================================================

#[tokio::test]
async fn test_reports_count_and_last_close() {
    let candles = generate_candles(3, NOW - LOOKBACK_MS);
    let exchange = MockExchange::returning(candles.clone());

    let output = run_to_string(&exchange).await.unwrap();

    assert_eq!(output, "Fetched 3 candles for mock:  last close 102\n");

    let printed_close: f64 = output
        .trim_end()
        .rsplit(' ')
        .next()
        .unwrap()
        .parse()
        .unwrap();
    assert_relative_eq!(printed_close, candles.last().unwrap().close);
}

#[tokio::test]
async fn test_reports_whatever_length_comes_back() {
    let exchange = MockExchange::returning(generate_candles(1, NOW - LOOKBACK_MS));
    let output = run_to_string(&exchange).await.unwrap();
    assert_eq!(output, "Fetched 1 candles for mock:  last close 100\n");
}

#[tokio::test]
async fn test_empty_sequence_prints_no_data() {
    let exchange = MockExchange::returning(Vec::new());
    let output = run_to_string(&exchange).await.unwrap();
    assert_eq!(output, "No candles have been fetched\n");
}

// =============================================================================
// Fetch parameters
// =============================================================================

#[tokio::test]
async fn test_single_call_with_fixed_parameters() {
    let exchange = MockExchange::returning(generate_candles(3, NOW - LOOKBACK_MS));
    run_to_string(&exchange).await.unwrap();

    let calls = exchange.calls();
    assert_eq!(calls.len(), 1);

    let call = &calls[0];
    assert_eq!(call.symbol, "BTC/USDT");
    assert_eq!(call.symbol, SYMBOL);
    assert_eq!(call.timeframe, "1m");
    assert_eq!(call.timeframe, TIMEFRAME);
    assert_eq!(call.limit, Some(3));
    assert_eq!(call.limit, Some(LIMIT));
}

#[tokio::test]
async fn test_since_is_24_hours_before_now() {
    let exchange = MockExchange::returning(Vec::new());
    run_to_string(&exchange).await.unwrap();

    let calls = exchange.calls();
    assert_eq!(calls[0].since, Some(NOW - 86_400_000));
}

#[tokio::test]
async fn test_options_pass_through_unchanged() {
    let exchange = MockExchange::returning(Vec::new());
    run_to_string(&exchange).await.unwrap();

    let calls = exchange.calls();
    let mut expected = Params::new();
    expected.insert("whatever".to_string(), json!(123));
    assert_eq!(calls[0].params, expected);
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_exchange_error_propagates_without_output() {
    let exchange = MockExchange::failing("rate limited");

    let mut out = Vec::new();
    let err = example::run(&exchange, &mut out).await.unwrap_err();

    assert!(out.is_empty());
    assert!(err.to_string().contains("Failed to fetch BTC/USDT 1m candles from Mock"));
    let root = err.root_cause().to_string();
    assert_eq!(root, "mock exchange failure: rate limited");
    assert_eq!(exchange.calls().len(), 1);
}
