//! Basic usage of the lease handler over a fixed pool

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use transpool::{
    FixedPool, HandlerConfig, LeaseHandler, ParamKind, PoolConfiguration, TypeDescriptor, Value,
};

struct KvClient {
    id: i64,
    store: std::collections::HashMap<String, String>,
}

impl KvClient {
    fn new(id: i64) -> Self {
        Self {
            id,
            store: std::collections::HashMap::new(),
        }
    }
}

fn descriptor() -> Arc<TypeDescriptor<KvClient>> {
    TypeDescriptor::builder("KvClient")
        .operation(
            "set",
            &[ParamKind::Str, ParamKind::Str],
            |client: &mut KvClient, args| {
                if let (Value::Str(key), Value::Str(value)) = (&args[0], &args[1]) {
                    client.store.insert(key.clone(), value.clone());
                }
                Ok(Value::Unit)
            },
        )
        .operation("get", &[ParamKind::Str], |client: &mut KvClient, args| {
            if let Value::Str(key) = &args[0] {
                match client.store.get(key) {
                    Some(value) => Ok(Value::Str(value.clone())),
                    None => Err(format!("no such key: {}", key).into()),
                }
            } else {
                Err("get expects a string key".into())
            }
        })
        .operation("whoami", &[], |client: &mut KvClient, _| {
            Ok(Value::Int(client.id))
        })
        .operation("close", &[], |_client, _| Ok(Value::Unit))
        .build()
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== transpool - Basic Examples ===\n");

    // Example 1: lazy acquisition and reuse
    lazy_acquisition();

    // Example 2: explicit release via close
    release_on_close();

    // Example 3: staleness invalidation
    staleness();

    // Example 4: metrics
    metrics();
}

fn lazy_acquisition() {
    println!("1. Lazy Acquisition:");
    let pool = Arc::new(FixedPool::new(
        vec![KvClient::new(1), KvClient::new(2)],
        descriptor(),
        PoolConfiguration::default(),
    ));
    let handler = LeaseHandler::new(pool.clone(), HandlerConfig::default());

    println!("   Available before first call: {}", pool.available_count());
    handler
        .call("set", &[Value::from("greeting"), Value::from("hello")])
        .unwrap();
    println!("   Available while leased: {}", pool.available_count());

    let value = handler.call("get", &[Value::from("greeting")]).unwrap();
    println!("   get(greeting) -> {:?} (same instance, no new borrow)\n", value);
}

fn release_on_close() {
    println!("2. Release on Close:");
    let pool = Arc::new(FixedPool::new(
        vec![KvClient::new(1)],
        descriptor(),
        PoolConfiguration::default(),
    ));
    let handler = LeaseHandler::new(pool.clone(), HandlerConfig::default());

    handler.call("whoami", &[]).unwrap();
    println!("   Holds lease: {}", handler.holds_lease());

    handler.call("close", &[]).unwrap();
    println!("   Holds lease after close: {}", handler.holds_lease());
    println!("   Available after close: {}\n", pool.available_count());
}

fn staleness() {
    println!("3. Staleness Invalidation:");
    let pool = Arc::new(FixedPool::new(
        vec![KvClient::new(1), KvClient::new(2)],
        descriptor(),
        PoolConfiguration::default(),
    ));
    let handler = LeaseHandler::new(
        pool,
        HandlerConfig::new().with_staleness_interval(Duration::from_millis(100)),
    );

    let first = handler.call("whoami", &[]).unwrap();
    println!("   First instance: {:?}", first);

    thread::sleep(Duration::from_millis(150));

    // The stale instance goes back to the pool; a fresh one is borrowed
    let second = handler.call("whoami", &[]).unwrap();
    println!("   Instance after interval elapsed: {:?}\n", second);
}

fn metrics() {
    println!("4. Metrics:");
    let pool = Arc::new(FixedPool::new(
        vec![KvClient::new(1)],
        descriptor(),
        PoolConfiguration::default(),
    ));
    let handler = LeaseHandler::new(pool, HandlerConfig::default());

    handler.call("whoami", &[]).unwrap();
    handler.call("whoami", &[]).unwrap();
    handler.call("close", &[]).unwrap();

    println!("   Metrics:");
    let mut entries: Vec<_> = handler.metrics().export().into_iter().collect();
    entries.sort();
    for (key, value) in entries {
        println!("     {}: {}", key, value);
    }
}
