//! The pool boundary and a fixed-set reference pool

use std::sync::Arc;
use std::time::Instant;

use crossbeam::queue::ArrayQueue;

use crate::config::PoolConfiguration;
use crate::descriptor::TypeDescriptor;
use crate::errors::{PoolError, PoolResult};

/// External provider of resource instances.
///
/// `allocate` may block until an instance is available, bounded only by the
/// pool's own policy; the lease layer adds no timeout of its own. Instances
/// move by value, so an instance handed out by `allocate` can be freed at
/// most once.
pub trait ResourcePool<R>: Send + Sync {
    /// Borrow an instance, blocking until one is available
    fn allocate(&self) -> PoolResult<R>;

    /// Return an instance to the pool
    fn free(&self, instance: R) -> PoolResult<()>;

    /// Descriptor of the pooled resource type
    fn describe_type(&self) -> Arc<TypeDescriptor<R>>;
}

/// Fixed-set pool: a bounded queue of pre-built instances.
///
/// Implements only the boundary contract a [`LeaseHandler`](crate::LeaseHandler)
/// needs. No sizing, eviction, or health checking happens here.
///
/// # Examples
///
/// ```
/// use transpool::{FixedPool, PoolConfiguration, ResourcePool, TypeDescriptor, Value};
///
/// let descriptor = TypeDescriptor::builder("i64")
///     .operation("get", &[], |value: &mut i64, _args| Ok(Value::Int(*value)))
///     .build();
///
/// let pool = FixedPool::new(vec![1i64, 2, 3], descriptor, PoolConfiguration::default());
/// assert_eq!(pool.available_count(), 3);
///
/// let instance = pool.allocate().unwrap();
/// assert_eq!(pool.available_count(), 2);
/// pool.free(instance).unwrap();
/// assert_eq!(pool.available_count(), 3);
/// ```
pub struct FixedPool<R> {
    available: ArrayQueue<R>,
    descriptor: Arc<TypeDescriptor<R>>,
    config: PoolConfiguration,
}

impl<R: Send> FixedPool<R> {
    /// Create a pool holding `instances`
    pub fn new(
        instances: Vec<R>,
        descriptor: Arc<TypeDescriptor<R>>,
        config: PoolConfiguration,
    ) -> Self {
        let capacity = instances.len().max(1);
        let available = ArrayQueue::new(capacity);
        for instance in instances {
            let _ = available.push(instance);
        }

        Self {
            available,
            descriptor,
            config,
        }
    }

    /// Take an instance without waiting
    pub fn try_allocate(&self) -> Option<R> {
        self.available.pop()
    }

    /// Take an instance asynchronously, polling until the acquire timeout
    pub async fn allocate_async(&self) -> PoolResult<R> {
        let Some(acquire_timeout) = self.config.acquire_timeout else {
            return self.try_allocate().ok_or(PoolError::Empty);
        };

        tokio::time::timeout(acquire_timeout, async {
            loop {
                match self.try_allocate() {
                    Some(instance) => return Ok(instance),
                    None => tokio::time::sleep(self.config.retry_interval).await,
                }
            }
        })
        .await
        .map_err(|_| PoolError::Timeout(acquire_timeout))?
    }

    /// Number of idle instances
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Total instances the pool can hold
    pub fn capacity(&self) -> usize {
        self.available.capacity()
    }
}

impl<R: Send> ResourcePool<R> for FixedPool<R> {
    fn allocate(&self) -> PoolResult<R> {
        let Some(acquire_timeout) = self.config.acquire_timeout else {
            return self.try_allocate().ok_or(PoolError::Empty);
        };

        let deadline = Instant::now() + acquire_timeout;
        loop {
            if let Some(instance) = self.available.pop() {
                return Ok(instance);
            }
            if Instant::now() >= deadline {
                return Err(PoolError::Timeout(acquire_timeout));
            }
            std::thread::sleep(self.config.retry_interval);
        }
    }

    fn free(&self, instance: R) -> PoolResult<()> {
        self.available.push(instance).map_err(|_| PoolError::Full)
    }

    fn describe_type(&self) -> Arc<TypeDescriptor<R>> {
        Arc::clone(&self.descriptor)
    }
}
