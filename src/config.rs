//! Configuration for lease handlers and the reference pool

use std::time::Duration;

/// Configuration for a [`LeaseHandler`](crate::LeaseHandler)
///
/// # Examples
///
/// ```
/// use transpool::HandlerConfig;
/// use std::time::Duration;
///
/// let config = HandlerConfig::new()
///     .with_staleness_interval(Duration::from_secs(5))
///     .with_release_operation("shutdown");
///
/// assert_eq!(config.staleness_interval, Duration::from_secs(5));
/// assert_eq!(config.release_operation, "shutdown");
/// ```
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// How long a lease may be held before the next call returns the
    /// instance and borrows a fresh one. A time bound on the lease, not a
    /// health check; the instance is never probed for liveness.
    pub staleness_interval: Duration,

    /// Operation name that terminates the lease. Matched by name only:
    /// every operation with this name releases the held instance,
    /// whatever its parameter types. Pick a different name here if the
    /// resource interface overloads it for something else.
    pub release_operation: String,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            staleness_interval: Duration::from_secs(60),
            release_operation: "close".to_string(),
        }
    }
}

impl HandlerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the staleness interval
    pub fn with_staleness_interval(mut self, interval: Duration) -> Self {
        self.staleness_interval = interval;
        self
    }

    /// Set the release operation name
    pub fn with_release_operation(mut self, name: impl Into<String>) -> Self {
        self.release_operation = name.into();
        self
    }
}

/// Configuration for a [`FixedPool`](crate::FixedPool)
///
/// # Examples
///
/// ```
/// use transpool::PoolConfiguration;
/// use std::time::Duration;
///
/// let config = PoolConfiguration::new()
///     .with_acquire_timeout(Duration::from_secs(5))
///     .with_retry_interval(Duration::from_millis(5));
///
/// assert_eq!(config.acquire_timeout, Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfiguration {
    /// How long `allocate` may wait for an instance. `None` fails fast
    /// with [`PoolError::Empty`](crate::PoolError::Empty) when the pool
    /// is exhausted.
    pub acquire_timeout: Option<Duration>,

    /// Poll interval while waiting for an instance
    pub retry_interval: Duration,
}

impl Default for PoolConfiguration {
    fn default() -> Self {
        Self {
            acquire_timeout: Some(Duration::from_secs(30)),
            retry_interval: Duration::from_millis(10),
        }
    }
}

impl PoolConfiguration {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the acquire timeout
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = Some(timeout);
        self
    }

    /// Fail fast instead of waiting when the pool is exhausted
    pub fn fail_fast(mut self) -> Self {
        self.acquire_timeout = None;
        self
    }

    /// Set the poll interval used while waiting
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_defaults() {
        let config = HandlerConfig::default();
        assert_eq!(config.staleness_interval, Duration::from_secs(60));
        assert_eq!(config.release_operation, "close");
    }

    #[test]
    fn test_pool_fail_fast() {
        let config = PoolConfiguration::new().fail_fast();
        assert_eq!(config.acquire_timeout, None);
    }
}
