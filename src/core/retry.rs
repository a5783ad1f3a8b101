//! Reactive backoff for throttled (HTTP 429) requests.
//!
//! The wait between attempts comes from the server's `Retry-After` header when
//! it can be read, otherwise from the policy's default delay. There is no
//! exponential growth and no jitter. Sleeping goes through [`Sleeper`] so tests
//! can record delays instead of waiting for them.

use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Suspends on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested delays and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .map(|delays| delays.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
    }
}

#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: Option<u32>,
    default_delay: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryPolicy {
    /// Retry forever, 1 second when the server gives no usable `Retry-After`.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            default_delay: Duration::from_secs(1),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Give up once `max_attempts` requests have all been throttled.
    pub fn bounded(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
            ..Self::unbounded()
        }
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn default_delay(&self) -> Duration {
        self.default_delay
    }

    /// Whether another request may follow `attempts` throttled ones.
    pub fn allows_retry(&self, attempts: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts < max)
    }

    /// Delay before the next attempt given the raw `Retry-After` header.
    pub fn delay_for(&self, retry_after: Option<&str>) -> Duration {
        retry_after
            .and_then(parse_retry_after)
            .unwrap_or(self.default_delay)
    }

    pub async fn wait(&self, delay: Duration) {
        self.sleeper.sleep(delay).await;
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("default_delay", &self.default_delay)
            .finish_non_exhaustive()
    }
}

/// Parses `Retry-After` as delta-seconds. Shopify sends decimals such as `2.0`.
/// HTTP-date values are not supported and yield `None`.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();

    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    value
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}
