//! Memoized resolution of call signatures to concrete operations

use std::sync::Arc;
use std::sync::atomic::Ordering;

use dashmap::DashMap;

use crate::descriptor::{Operation, Signature, TypeDescriptor};
use crate::errors::{LeaseError, LeaseResult};
use crate::metrics::MetricsTracker;
use crate::value::ParamKind;

/// Maps intercepted call signatures to concrete operations on the resource
/// type, memoizing each mapping.
///
/// Entries never change once written: the descriptor's operation set is
/// static, so the cache needs no invalidation. The key set is bounded by
/// the number of distinct operations on the resource type.
pub struct MethodResolver<R> {
    descriptor: Arc<TypeDescriptor<R>>,
    cache: DashMap<Signature, Arc<Operation<R>>>,
    metrics: Arc<MetricsTracker>,
}

impl<R> MethodResolver<R> {
    /// Create a resolver over `descriptor`
    pub fn new(descriptor: Arc<TypeDescriptor<R>>) -> Self {
        Self::with_metrics(descriptor, Arc::new(MetricsTracker::new()))
    }

    pub(crate) fn with_metrics(
        descriptor: Arc<TypeDescriptor<R>>,
        metrics: Arc<MetricsTracker>,
    ) -> Self {
        Self {
            descriptor,
            cache: DashMap::new(),
            metrics,
        }
    }

    /// Resolve `(name, params)` to a concrete operation.
    ///
    /// Served from the cache when possible; a miss queries the type
    /// descriptor once and memoizes the match. A signature with no matching
    /// operation fails with [`LeaseError::NoSuchOperation`].
    pub fn resolve(&self, name: &str, params: &[ParamKind]) -> LeaseResult<Arc<Operation<R>>> {
        let key = Signature::new(name, params);
        if let Some(operation) = self.cache.get(&key) {
            self.metrics.resolution_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(operation.value()));
        }

        self.metrics.resolution_misses.fetch_add(1, Ordering::Relaxed);
        match self.descriptor.lookup(name, params) {
            Some(operation) => {
                self.cache.insert(key, Arc::clone(&operation));
                Ok(operation)
            }
            None => Err(LeaseError::NoSuchOperation {
                name: name.to_string(),
                params: params.to_vec(),
            }),
        }
    }

    /// Number of memoized signatures
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct Conn;

    fn resolver() -> MethodResolver<Conn> {
        let descriptor = TypeDescriptor::builder("Conn")
            .operation("get", &[ParamKind::Str], |_conn: &mut Conn, args| {
                Ok(args[0].clone())
            })
            .operation("get", &[ParamKind::Int], |_conn: &mut Conn, args| {
                Ok(args[0].clone())
            })
            .operation("close", &[], |_conn: &mut Conn, _| Ok(Value::Unit))
            .build();
        MethodResolver::new(descriptor)
    }

    #[test]
    fn test_second_resolution_served_from_cache() {
        let resolver = resolver();

        resolver.resolve("get", &[ParamKind::Str]).unwrap();
        resolver.resolve("get", &[ParamKind::Str]).unwrap();

        assert_eq!(resolver.cached_len(), 1);
        let metrics = resolver.metrics.snapshot();
        assert_eq!(metrics.resolution_misses, 1);
        assert_eq!(metrics.resolution_hits, 1);
    }

    #[test]
    fn test_overloads_cache_separately() {
        let resolver = resolver();

        let by_str = resolver.resolve("get", &[ParamKind::Str]).unwrap();
        let by_int = resolver.resolve("get", &[ParamKind::Int]).unwrap();

        assert_eq!(resolver.cached_len(), 2);
        assert_ne!(by_str.signature(), by_int.signature());
    }

    #[test]
    fn test_unknown_signature_fails_without_caching() {
        let resolver = resolver();

        let err = resolver.resolve("missing", &[]).unwrap_err();
        assert!(matches!(
            err,
            LeaseError::NoSuchOperation { ref name, .. } if name == "missing"
        ));
        assert_eq!(resolver.cached_len(), 0);

        // Arity mismatch is a miss too
        let err = resolver.resolve("close", &[ParamKind::Int]).unwrap_err();
        assert!(matches!(err, LeaseError::NoSuchOperation { .. }));
    }
}
