//! Index readiness polling
//!
//! After a creation request is accepted, the controller provisions the index
//! asynchronously. [`wait_until_ready`] polls the describe endpoint until a
//! terminal state is observed, the attempt budget runs out, or the caller
//! cancels.
//!
//! State machine: `Polling` self-loops on every non-terminal status
//! (including "not found", which simply means the index is not visible
//! yet); `Ready` resolves the wait and `Failed` rejects it. Query errors
//! other than not-found are fatal and propagate without retry.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{IndexDescription, IndexState};
use crate::error::{Error, Result};

/// Status-query capability consumed by the poller.
///
/// The production implementation is [`crate::api::RestApi`]; tests supply
/// scripted stubs.
#[async_trait]
pub trait DescribeIndex: Send + Sync {
    /// Fetch the current provisioning description of `name`.
    async fn describe_index(&self, name: &str) -> Result<IndexDescription>;
}

/// Polling behavior for [`wait_until_ready`]
#[derive(Debug, Clone)]
pub struct ReadinessConfig {
    /// Delay before the first retry
    pub poll_interval: Duration,
    /// Backoff multiplier applied per attempt (1.0 = constant delay)
    pub backoff_multiplier: f64,
    /// Upper bound on the inter-attempt delay
    pub max_interval: Duration,
    /// Maximum number of status queries before giving up
    pub max_attempts: u32,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        // The 1s constant delay matches the controller's documented
        // provisioning cadence; the attempt cap bounds the wait at ~5min.
        Self {
            poll_interval: Duration::from_secs(1),
            backoff_multiplier: 1.0,
            max_interval: Duration::from_secs(30),
            max_attempts: 300,
        }
    }
}

impl ReadinessConfig {
    /// Set the base poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the backoff multiplier (1.0 keeps the delay constant)
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Set the maximum inter-attempt delay
    pub fn with_max_interval(mut self, max: Duration) -> Self {
        self.max_interval = max;
        self
    }

    /// Set the attempt budget
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Delay to sleep after `attempt` (zero-based).
    fn delay_for(&self, attempt: u32) -> Duration {
        if self.backoff_multiplier <= 1.0 {
            return self.poll_interval.min(self.max_interval);
        }
        let factor = self.backoff_multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        self.poll_interval.mul_f64(factor).min(self.max_interval)
    }
}

/// Wait until `name` reaches a terminal provisioning state.
///
/// Resolves when the index reports `Ready`. Fails with:
///
/// - [`Error::IndexNameMissing`] before any query when `name` is empty
/// - [`Error::CreationFailed`] as soon as `Failed` is observed
/// - [`Error::RetryExhausted`] after `config.max_attempts` non-terminal
///   observations
/// - [`Error::Cancelled`] when `cancel` fires between attempts or during
///   the inter-attempt delay
/// - any other query error, unchanged ("not found" is not an error here —
///   the index is simply not visible yet)
pub async fn wait_until_ready<A>(
    api: &A,
    name: &str,
    config: &ReadinessConfig,
    cancel: &CancellationToken,
) -> Result<()>
where
    A: DescribeIndex + ?Sized,
{
    if name.is_empty() {
        return Err(Error::IndexNameMissing);
    }

    for attempt in 0..config.max_attempts {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        match api.describe_index(name).await {
            Ok(desc) => match desc.status {
                IndexState::Ready => {
                    debug!(index = name, attempt, "index ready");
                    return Ok(());
                }
                IndexState::Failed => {
                    warn!(index = name, attempt, "index creation failed");
                    return Err(Error::CreationFailed(name.to_string()));
                }
                state => {
                    debug!(index = name, attempt, ?state, "index not ready yet");
                }
            },
            Err(e) if e.is_not_found() => {
                debug!(index = name, attempt, "index not visible yet");
            }
            Err(e) => return Err(e),
        }

        // Don't sleep after the final attempt.
        if attempt + 1 == config.max_attempts {
            break;
        }

        let delay = config.delay_for(attempt);
        tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            _ = sleep(delay) => {}
        }
    }

    Err(Error::RetryExhausted {
        name: name.to_string(),
        attempts: config.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_delay() {
        let config = ReadinessConfig::default();
        assert_eq!(config.delay_for(0), Duration::from_secs(1));
        assert_eq!(config.delay_for(10), Duration::from_secs(1));
    }

    #[test]
    fn test_exponential_delay_capped() {
        let config = ReadinessConfig::default()
            .with_poll_interval(Duration::from_secs(1))
            .with_backoff_multiplier(2.0)
            .with_max_interval(Duration::from_secs(8));
        assert_eq!(config.delay_for(0), Duration::from_secs(1));
        assert_eq!(config.delay_for(1), Duration::from_secs(2));
        assert_eq!(config.delay_for(2), Duration::from_secs(4));
        assert_eq!(config.delay_for(3), Duration::from_secs(8));
        assert_eq!(config.delay_for(10), Duration::from_secs(8));
    }
}
