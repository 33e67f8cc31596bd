//! Request throttle
//!
//! Exchanges publish a minimum spacing between public requests (OKX: 100 ms).
//! The throttle enforces that spacing across every clone of a client.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Configuration for the throttle
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    /// Minimum time between two granted requests
    pub interval: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
        }
    }
}

impl ThrottleConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Spaces requests at least `interval` apart
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use okx_ohlcv_example::common::{Throttle, ThrottleConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let throttle = Throttle::new(ThrottleConfig::default().with_interval(Duration::from_millis(5)));
///
///     throttle.acquire().await;
///     // Make API request...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Throttle {
    last_grant: Arc<Mutex<Option<Instant>>>,
    interval: Duration,
}

impl Throttle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            last_grant: Arc::new(Mutex::new(None)),
            interval: config.interval,
        }
    }

    /// Wait until the interval since the previous grant has passed
    ///
    /// The lock is held while sleeping so concurrent callers queue up in order.
    pub async fn acquire(&self) {
        let mut last_grant = self.last_grant.lock().await;

        if let Some(last) = *last_grant {
            let ready_at = last + self.interval;
            if ready_at > Instant::now() {
                tracing::debug!(
                    "Throttling request for {}ms",
                    (ready_at - Instant::now()).as_millis()
                );
                sleep_until(ready_at).await;
            }
        }

        *last_grant = Some(Instant::now());
    }

    /// Grant immediately if no wait is needed, otherwise return `false`
    pub async fn try_acquire(&self) -> bool {
        let mut last_grant = self.last_grant.lock().await;

        let ready = match *last_grant {
            Some(last) => last.elapsed() >= self.interval,
            None => true,
        };

        if ready {
            *last_grant = Some(Instant::now());
        }
        ready
    }
}
