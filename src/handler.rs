//! The lease handler: transparent pooled dispatch with time-based staleness

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::HandlerConfig;
use crate::errors::{LeaseError, LeaseResult};
use crate::metrics::{LeaseMetrics, MetricsTracker};
use crate::pool::ResourcePool;
use crate::resolver::MethodResolver;
use crate::value::{ParamKind, Value};

/// A held instance and the time its lease began.
///
/// Pairing the timestamp with the instance makes "timestamp defined iff an
/// instance is held" hold by construction.
struct Lease<R> {
    instance: R,
    acquired_at: Instant,
}

/// Dispatches calls onto a pooled resource instance, borrowing and
/// returning instances on demand.
///
/// At most one instance is held at a time. Acquisition is lazy: the first
/// dispatched call borrows from the pool, later calls reuse the held
/// instance until the staleness interval elapses, at which point the next
/// call returns it and borrows a fresh one. Invoking the configured release
/// operation (`"close"` by default) always returns the held instance, even
/// when the operation itself fails.
///
/// The staleness-check/acquire/invoke/release sequence runs as one atomic
/// section per handler; concurrent callers serialize through it. Without
/// that region the staleness check and the release path can race, freeing
/// one instance twice or dispatching onto an instance already returned, so
/// the whole sequence holds the lease mutex.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use transpool::{
///     FixedPool, HandlerConfig, LeaseHandler, PoolConfiguration, TypeDescriptor, Value,
/// };
///
/// struct Counter {
///     hits: i64,
/// }
///
/// let descriptor = TypeDescriptor::builder("Counter")
///     .operation("hit", &[], |counter: &mut Counter, _args| {
///         counter.hits += 1;
///         Ok(Value::Int(counter.hits))
///     })
///     .operation("close", &[], |_counter, _args| Ok(Value::Unit))
///     .build();
///
/// let pool = Arc::new(FixedPool::new(
///     vec![Counter { hits: 0 }],
///     descriptor,
///     PoolConfiguration::default(),
/// ));
/// let handler = LeaseHandler::new(
///     pool,
///     HandlerConfig::new().with_staleness_interval(Duration::from_secs(60)),
/// );
///
/// assert_eq!(handler.call("hit", &[]).unwrap(), Value::Int(1));
/// assert!(handler.holds_lease());
///
/// handler.call("close", &[]).unwrap();
/// assert!(!handler.holds_lease());
/// ```
pub struct LeaseHandler<R> {
    pool: Arc<dyn ResourcePool<R>>,
    resolver: MethodResolver<R>,
    lease: Mutex<Option<Lease<R>>>,
    staleness_ms: u128,
    release_operation: String,
    metrics: Arc<MetricsTracker>,
}

impl<R> LeaseHandler<R> {
    /// Create a handler bound to `pool`.
    ///
    /// The staleness interval is normalized to whole milliseconds.
    pub fn new(pool: Arc<dyn ResourcePool<R>>, config: HandlerConfig) -> Self {
        let metrics = Arc::new(MetricsTracker::new());
        let resolver = MethodResolver::with_metrics(pool.describe_type(), Arc::clone(&metrics));
        Self {
            pool,
            resolver,
            lease: Mutex::new(None),
            staleness_ms: config.staleness_interval.as_millis(),
            release_operation: config.release_operation,
            metrics,
        }
    }

    /// Dispatch one intercepted call.
    ///
    /// `params` are the parameter type tags of the intercepted signature
    /// and select between same-named operations; `args` pass through to the
    /// resolved operation unchanged. The result, or the failure, of the
    /// operation is returned as-is.
    pub fn invoke(&self, name: &str, params: &[ParamKind], args: &[Value]) -> LeaseResult<Value> {
        let mut slot = self.lease.lock();
        let now = Instant::now();
        self.metrics.total_calls.fetch_add(1, Ordering::Relaxed);

        // A stale instance goes back to the pool before the call is
        // serviced. The slot is cleared first so a failed free cannot
        // leave a returned instance reachable.
        if let Some(stale) = slot
            .take_if(|lease| now.duration_since(lease.acquired_at).as_millis() > self.staleness_ms)
        {
            let held_ms = now.duration_since(stale.acquired_at).as_millis() as u64;
            self.metrics.stale_invalidations.fetch_add(1, Ordering::Relaxed);
            debug!(held_ms, "lease went stale, returning instance to pool");
            self.pool
                .free(stale.instance)
                .map_err(LeaseError::Invalidation)?;
        }

        // Resolution failure is fatal to the call and leaves the slot as
        // it is: nothing has been allocated yet.
        let operation = self.resolver.resolve(name, params)?;

        if slot.is_none() {
            let instance = self.pool.allocate().map_err(LeaseError::Allocation)?;
            self.metrics.allocations.fetch_add(1, Ordering::Relaxed);
            debug!("borrowed instance from pool");
            *slot = Some(Lease {
                instance,
                acquired_at: now,
            });
        }

        let lease = slot.as_mut().expect("lease present after acquisition");
        let result = operation.invoke(&mut lease.instance, args);

        // The release call terminates the lease whether or not the
        // operation itself succeeded. Matched by name only.
        if name == self.release_operation {
            if let Some(lease) = slot.take() {
                self.metrics.releases.fetch_add(1, Ordering::Relaxed);
                if let Err(err) = self.pool.free(lease.instance) {
                    // The delegated result wins; the failed free is
                    // recorded and logged.
                    self.metrics.release_failures.fetch_add(1, Ordering::Relaxed);
                    warn!(error = %err, "failed to return instance to pool on release");
                }
            }
        }

        result.map_err(LeaseError::Operation)
    }

    /// Dispatch a call whose parameter tags are derived from its arguments.
    ///
    /// This is what a generated facade forwards through.
    pub fn call(&self, name: &str, args: &[Value]) -> LeaseResult<Value> {
        let params = Value::kinds(args);
        self.invoke(name, &params, args)
    }

    /// The pool this handler borrows from
    pub fn pool(&self) -> &Arc<dyn ResourcePool<R>> {
        &self.pool
    }

    /// Whether an instance is currently held
    pub fn holds_lease(&self) -> bool {
        self.lease.lock().is_some()
    }

    /// Snapshot of the handler's counters
    pub fn metrics(&self) -> LeaseMetrics {
        self.metrics.snapshot()
    }
}
