//! Metrics collection and export for lease handlers

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Snapshot of a handler's counters
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use transpool::{FixedPool, HandlerConfig, LeaseHandler, PoolConfiguration, TypeDescriptor, Value};
///
/// struct Conn;
///
/// let descriptor = TypeDescriptor::builder("Conn")
///     .operation("ping", &[], |_conn: &mut Conn, _args| Ok(Value::Unit))
///     .build();
/// let pool = Arc::new(FixedPool::new(vec![Conn], descriptor, PoolConfiguration::default()));
/// let handler = LeaseHandler::new(pool, HandlerConfig::default());
///
/// handler.call("ping", &[]).unwrap();
/// let metrics = handler.metrics();
/// assert_eq!(metrics.total_calls, 1);
/// assert_eq!(metrics.allocations, 1);
/// ```
#[derive(Debug, Clone)]
pub struct LeaseMetrics {
    /// Total calls dispatched through the handler
    pub total_calls: usize,

    /// Instances borrowed from the pool
    pub allocations: usize,

    /// Instances returned via the release operation
    pub releases: usize,

    /// Instances returned because their lease went stale
    pub stale_invalidations: usize,

    /// Release-path frees that failed (logged, never surfaced)
    pub release_failures: usize,

    /// Resolutions served from the cache
    pub resolution_hits: usize,

    /// Resolutions that queried the type descriptor
    pub resolution_misses: usize,
}

impl LeaseMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_calls".to_string(), self.total_calls.to_string());
        metrics.insert("allocations".to_string(), self.allocations.to_string());
        metrics.insert("releases".to_string(), self.releases.to_string());
        metrics.insert(
            "stale_invalidations".to_string(),
            self.stale_invalidations.to_string(),
        );
        metrics.insert(
            "release_failures".to_string(),
            self.release_failures.to_string(),
        );
        metrics.insert(
            "resolution_hits".to_string(),
            self.resolution_hits.to_string(),
        );
        metrics.insert(
            "resolution_misses".to_string(),
            self.resolution_misses.to_string(),
        );
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use transpool::{LeaseMetrics, MetricsExporter};
    ///
    /// let metrics = LeaseMetrics {
    ///     total_calls: 10,
    ///     allocations: 2,
    ///     releases: 1,
    ///     stale_invalidations: 1,
    ///     release_failures: 0,
    ///     resolution_hits: 8,
    ///     resolution_misses: 2,
    /// };
    ///
    /// let output = MetricsExporter::export_prometheus(&metrics, "redis", None);
    /// assert!(output.contains("transpool_calls_total"));
    /// assert!(output.contains("handler=\"redis\""));
    /// ```
    pub fn export_prometheus(
        metrics: &LeaseMetrics,
        handler_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let mut output = String::new();
        let labels = Self::format_labels(handler_name, tags);

        let counters: [(&str, &str, usize); 7] = [
            ("transpool_calls_total", "Total dispatched calls", metrics.total_calls),
            ("transpool_allocations_total", "Instances borrowed from the pool", metrics.allocations),
            ("transpool_releases_total", "Instances returned via the release operation", metrics.releases),
            ("transpool_stale_invalidations_total", "Instances returned after going stale", metrics.stale_invalidations),
            ("transpool_release_failures_total", "Release-path frees that failed", metrics.release_failures),
            ("transpool_resolution_hits_total", "Resolutions served from cache", metrics.resolution_hits),
            ("transpool_resolution_misses_total", "Resolutions that queried the descriptor", metrics.resolution_misses),
        ];

        for (name, help, value) in counters {
            output.push_str(&format!("# HELP {} {}\n", name, help));
            output.push_str(&format!("# TYPE {} counter\n", name));
            output.push_str(&format!("{}{{{}}} {}\n", name, labels, value));
        }

        output
    }

    fn format_labels(handler_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("handler=\"{}\"", handler_name)];

        if let Some(tags) = tags {
            for (key, value) in tags {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal metrics tracker
pub(crate) struct MetricsTracker {
    pub total_calls: AtomicUsize,
    pub allocations: AtomicUsize,
    pub releases: AtomicUsize,
    pub stale_invalidations: AtomicUsize,
    pub release_failures: AtomicUsize,
    pub resolution_hits: AtomicUsize,
    pub resolution_misses: AtomicUsize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            total_calls: AtomicUsize::new(0),
            allocations: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            stale_invalidations: AtomicUsize::new(0),
            release_failures: AtomicUsize::new(0),
            resolution_hits: AtomicUsize::new(0),
            resolution_misses: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self) -> LeaseMetrics {
        LeaseMetrics {
            total_calls: self.total_calls.load(Ordering::Relaxed),
            allocations: self.allocations.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            stale_invalidations: self.stale_invalidations.load(Ordering::Relaxed),
            release_failures: self.release_failures.load(Ordering::Relaxed),
            resolution_hits: self.resolution_hits.load(Ordering::Relaxed),
            resolution_misses: self.resolution_misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LeaseMetrics {
        LeaseMetrics {
            total_calls: 5,
            allocations: 2,
            releases: 1,
            stale_invalidations: 1,
            release_failures: 0,
            resolution_hits: 3,
            resolution_misses: 2,
        }
    }

    #[test]
    fn test_export_contains_all_counters() {
        let exported = sample().export();
        assert_eq!(exported.get("total_calls"), Some(&"5".to_string()));
        assert_eq!(exported.get("allocations"), Some(&"2".to_string()));
        assert_eq!(exported.get("resolution_misses"), Some(&"2".to_string()));
        assert_eq!(exported.len(), 7);
    }

    #[test]
    fn test_prometheus_output_includes_tags() {
        let mut tags = HashMap::new();
        tags.insert("service".to_string(), "api".to_string());

        let output = MetricsExporter::export_prometheus(&sample(), "redis", Some(&tags));
        assert!(output.contains("transpool_allocations_total"));
        assert!(output.contains("handler=\"redis\""));
        assert!(output.contains("service=\"api\""));
        assert!(output.contains("# TYPE transpool_calls_total counter"));
    }

    #[test]
    fn test_tracker_snapshot() {
        let tracker = MetricsTracker::new();
        tracker.total_calls.fetch_add(3, Ordering::Relaxed);
        tracker.allocations.fetch_add(1, Ordering::Relaxed);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.total_calls, 3);
        assert_eq!(snapshot.allocations, 1);
        assert_eq!(snapshot.releases, 0);
    }
}
