//! # transpool
//!
//! Transparent resource leasing over a pool. A [`LeaseHandler`] presents
//! callers with what behaves like a single long-lived resource instance
//! while borrowing and returning instances from a pool on demand.
//!
//! ## Features
//!
//! - Lazy acquisition: the first dispatched call borrows an instance
//! - Time-based staleness: a lease held past the configured interval is
//!   returned at the next call and a fresh instance borrowed
//! - Release-on-close: the designated release operation always returns the
//!   held instance, even when the operation itself fails
//! - Memoized method resolution keyed by (name, parameter types)
//! - One atomic staleness-check/acquire/invoke/release section per handler
//! - Handler metrics with HashMap and Prometheus-format export
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use transpool::{
//!     FixedPool, HandlerConfig, LeaseHandler, PoolConfiguration, TypeDescriptor, Value,
//! };
//!
//! struct Counter {
//!     hits: i64,
//! }
//!
//! let descriptor = TypeDescriptor::builder("Counter")
//!     .operation("hit", &[], |counter: &mut Counter, _args| {
//!         counter.hits += 1;
//!         Ok(Value::Int(counter.hits))
//!     })
//!     .operation("close", &[], |_counter, _args| Ok(Value::Unit))
//!     .build();
//!
//! let pool = Arc::new(FixedPool::new(
//!     vec![Counter { hits: 0 }],
//!     descriptor,
//!     PoolConfiguration::default(),
//! ));
//!
//! let handler = LeaseHandler::new(
//!     pool,
//!     HandlerConfig::new().with_staleness_interval(Duration::from_secs(60)),
//! );
//!
//! assert_eq!(handler.call("hit", &[]).unwrap(), Value::Int(1));
//! handler.call("close", &[]).unwrap();
//! assert!(!handler.holds_lease());
//! ```

mod config;
mod descriptor;
mod errors;
mod handler;
mod metrics;
mod pool;
mod resolver;
mod value;

pub use config::{HandlerConfig, PoolConfiguration};
pub use descriptor::{DescriptorBuilder, Operation, OperationResult, Signature, TypeDescriptor};
pub use errors::{BoxedError, LeaseError, LeaseResult, PoolError, PoolResult};
pub use handler::LeaseHandler;
pub use metrics::{LeaseMetrics, MetricsExporter};
pub use pool::{FixedPool, ResourcePool};
pub use resolver::MethodResolver;
pub use value::{ParamKind, Value};
