//! OKX-specific error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OkxError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("OKX error {code}: {msg}")]
    Exchange { code: String, msg: String },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Exchange not available: {0}")]
    ExchangeNotAvailable(String),

    #[error("Bad symbol: {0}")]
    BadSymbol(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl OkxError {
    /// Map a non-zero `code` from the response envelope
    pub fn from_code(code: &str, msg: &str) -> Self {
        match code {
            "50011" | "50061" => Self::RateLimitExceeded,
            "51001" => Self::BadSymbol(msg.to_string()),
            "50001" | "50013" | "50026" => Self::ExchangeNotAvailable(msg.to_string()),
            _ => Self::Exchange {
                code: code.to_string(),
                msg: msg.to_string(),
            },
        }
    }
}

pub type OkxResult<T> = Result<T, OkxError>;
