//! OKX OHLCV Example
//!
//! Fetches a few recent candlesticks from OKX and prints a one-line summary.
//!
//! The example runner talks to any [`exchange::Exchange`]; the crate ships an
//! OKX public market-data client implementing it.
//!
//! ```no_run
//! use okx_ohlcv_example::{example, OkxClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OkxClient::new()?;
//!     example::run(&client, &mut std::io::stdout()).await
//! }
//! ```

pub mod common;
pub mod config;
pub mod example;
pub mod exchange;
pub mod okx;

pub use config::ClientConfig;
pub use exchange::{Exchange, Ohlcv, Params};
pub use okx::OkxClient;
