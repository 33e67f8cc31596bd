//! OKX public market-data client
//!
//! # Example
//! ```no_run
//! use okx_ohlcv_example::exchange::{Exchange, Params};
//! use okx_ohlcv_example::okx::OkxClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OkxClient::new()?;
//!     let candles = client
//!         .fetch_ohlcv("BTC/USDT", "1h", None, Some(24), &Params::new())
//!         .await?;
//!     println!("Fetched {} candles", candles.len());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::{OkxError, OkxResult};
use super::types::{parse_candle, to_inst_id, to_okx_bar, CandlesEndpoint, OkxResponse, DEFAULT_LIMIT};
use crate::common::Throttle;
use crate::config::ClientConfig;
use crate::exchange::{filter_by_since_limit, parse_timeframe, Exchange, Ohlcv, Params};

/// A fully resolved candles request: which endpoint and which query string
#[derive(Debug, Clone, PartialEq)]
pub struct CandlesRequest {
    pub endpoint: CandlesEndpoint,
    pub limit: u32,
    pub query: Vec<(String, String)>,
}

impl CandlesRequest {
    /// Resolve endpoint, limit and time window for a candles call
    ///
    /// `now` is the current time in milliseconds; it decides whether `since`
    /// is old enough to need the history endpoint.
    pub fn build(
        symbol: &str,
        timeframe: &str,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
        now: i64,
    ) -> OkxResult<Self> {
        let inst_id = to_inst_id(symbol)?;
        let bar = to_okx_bar(timeframe)?;
        let duration_ms = parse_timeframe(timeframe)
            .ok_or_else(|| OkxError::BadRequest(format!("Unsupported timeframe: {}", timeframe)))?
            * 1000;

        let requested = limit.unwrap_or(DEFAULT_LIMIT);

        let forced = match params.get("method") {
            Some(Value::String(method)) => Some(
                CandlesEndpoint::from_method(method)
                    .ok_or_else(|| OkxError::BadRequest(format!("Unknown method: {}", method)))?,
            ),
            Some(other) => {
                return Err(OkxError::BadRequest(format!("Invalid method param: {}", other)));
            }
            None => None,
        };

        let endpoint = forced.unwrap_or(match since {
            Some(since) if now.saturating_sub(since) > i64::from(requested).saturating_mul(duration_ms) => {
                CandlesEndpoint::History
            }
            _ => CandlesEndpoint::Recent,
        });

        let limit = requested.min(endpoint.max_limit());

        let mut query = vec![
            ("instId".to_string(), inst_id),
            ("bar".to_string(), bar),
            ("limit".to_string(), limit.to_string()),
        ];

        if let Some(since) = since {
            let before = since.saturating_sub(1).max(0);
            let after = before.saturating_add(duration_ms.saturating_mul(i64::from(limit)));
            query.push(("before".to_string(), before.to_string()));
            query.push(("after".to_string(), after.to_string()));
        }

        for (key, value) in params {
            if key == "method" {
                continue;
            }
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Null => continue,
                other => other.to_string(),
            };
            match query.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1 = value,
                None => query.push((key.clone(), value)),
            }
        }

        Ok(CandlesRequest {
            endpoint,
            limit,
            query,
        })
    }
}

/// Turn data rows into candles sorted oldest first, dropping malformed rows
pub fn parse_candles(rows: &[Vec<Value>]) -> Vec<Ohlcv> {
    let mut candles: Vec<Ohlcv> = rows
        .iter()
        .filter_map(|row| {
            let candle = parse_candle(row);
            if candle.is_none() {
                warn!("Skipping malformed candle row: {:?}", row);
            }
            candle
        })
        .collect();

    candles.sort_by_key(|c| c.timestamp);
    candles
}

/// Map an HTTP status to an error; 429 is the rate limit
pub fn check_status(status: StatusCode, body: &str) -> OkxResult<()> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(OkxError::RateLimitExceeded);
    }
    if !status.is_success() {
        return Err(OkxError::Http {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }
    Ok(())
}

/// OKX API client
#[derive(Debug, Clone)]
pub struct OkxClient {
    http_client: Client,
    throttle: Throttle,
    base_url: String,
    sandbox: bool,
}

impl OkxClient {
    pub const ID: &'static str = "okx";
    pub const NAME: &'static str = "OKX";

    /// Create a client with default configuration
    pub fn new() -> OkxResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> OkxResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        let base_url = config.base_url();
        info!(
            "OKX client ready: base_url={}, sandbox={}, rate_limit={}ms",
            base_url,
            config.sandbox,
            config.throttle.interval.as_millis()
        );

        Ok(OkxClient {
            http_client,
            throttle: Throttle::new(config.throttle),
            base_url,
            sandbox: config.sandbox,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET request with the query and, in sandbox mode, the demo-trading header
    fn get_request(&self, url: &str, query: &[(String, String)]) -> RequestBuilder {
        let request = self.http_client.get(url).query(query);
        if self.sandbox {
            request.header("x-simulated-trading", "1")
        } else {
            request
        }
    }

    /// GET a public endpoint and unwrap the response envelope
    async fn public_get(&self, path: &str, query: &[(String, String)]) -> OkxResult<Vec<Vec<Value>>> {
        let url = format!("{}/{}", self.base_url, path);

        self.throttle.acquire().await;
        debug!("GET {} {:?}", url, query);

        let response = self.get_request(&url, query).send().await?;

        let status = response.status();
        let body = response.text().await?;
        check_status(status, &body)?;

        let envelope: OkxResponse = serde_json::from_str(&body)
            .map_err(|e| OkxError::Parse(format!("Failed to parse OKX response: {}", e)))?;

        envelope.into_data()
    }
}

#[async_trait]
impl Exchange for OkxClient {
    type Error = OkxError;

    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: &str,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> OkxResult<Vec<Ohlcv>> {
        let request = CandlesRequest::build(symbol, timeframe, since, limit, params, self.milliseconds())?;

        debug!(
            "Fetching candles: symbol={}, timeframe={}, endpoint={}, limit={}",
            symbol,
            timeframe,
            request.endpoint.path(),
            request.limit
        );

        let rows = self.public_get(request.endpoint.path(), &request.query).await?;
        let candles = filter_by_since_limit(parse_candles(&rows), since, Some(request.limit));

        info!("Fetched {} candles for {} {}", candles.len(), symbol, timeframe);

        Ok(candles)
    }
}
