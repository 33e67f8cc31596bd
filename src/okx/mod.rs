//! OKX public market-data client
//!
//! Covers the candles endpoints only. No API key is required.

pub mod client;
pub mod error;
pub mod types;

pub use client::{CandlesRequest, OkxClient};
pub use error::{OkxError, OkxResult};
pub use types::{to_inst_id, to_okx_bar, CandlesEndpoint, TIMEFRAMES};
