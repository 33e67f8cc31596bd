//! Client configuration
//!
//! Defaults match OKX's public REST API. Any field can be overridden with the
//! `with_*` builders or, for the binary, through environment variables
//! (a `.env` file is loaded first when present).

use anyhow::{Context, Result};
use std::time::Duration;

use crate::common::ThrottleConfig;

/// Default REST host
pub const DEFAULT_HOSTNAME: &str = "www.okx.com";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host serving `/api/v5`
    pub hostname: String,
    /// Request timeout
    pub timeout: Duration,
    /// Minimum spacing between requests
    pub throttle: ThrottleConfig,
    /// Send `x-simulated-trading: 1` (demo trading environment)
    pub sandbox: bool,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            timeout: Duration::from_secs(10),
            throttle: ThrottleConfig::default(),
            sandbox: false,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the minimum spacing between requests
    pub fn with_rate_limit(mut self, interval: Duration) -> Self {
        self.throttle = self.throttle.with_interval(interval);
        self
    }

    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Base URL for REST calls, e.g. `https://www.okx.com/api/v5`
    pub fn base_url(&self) -> String {
        format!("https://{}/api/v5", self.hostname)
    }

    /// Build from defaults plus environment overrides
    ///
    /// Reads `OKX_HOSTNAME`, `OKX_SANDBOX`, `OKX_TIMEOUT_SECS` and
    /// `OKX_RATE_LIMIT_MS`.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from defaults plus overrides returned by `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(hostname) = lookup("OKX_HOSTNAME") {
            let hostname = hostname.trim();
            if !hostname.is_empty() {
                config.hostname = hostname.to_string();
            }
        }

        if let Some(sandbox) = lookup("OKX_SANDBOX") {
            config.sandbox = parse_flag(&sandbox)
                .with_context(|| format!("Invalid OKX_SANDBOX value: {}", sandbox))?;
        }

        if let Some(secs) = lookup("OKX_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid OKX_TIMEOUT_SECS value: {}", secs))?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(ms) = lookup("OKX_RATE_LIMIT_MS") {
            let ms: u64 = ms
                .trim()
                .parse()
                .with_context(|| format!("Invalid OKX_RATE_LIMIT_MS value: {}", ms))?;
            config.throttle = config.throttle.with_interval(Duration::from_millis(ms));
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {:?}", other),
    }
}
