// transpool - transparent resource leasing over a pool

// This is just a binary wrapper - the actual library is in lib.rs
// Run demos with: cargo run --example basic

use std::sync::Arc;

use transpool::{
    FixedPool, HandlerConfig, LeaseHandler, PoolConfiguration, TypeDescriptor, Value,
};

struct Session {
    id: i64,
}

fn main() {
    println!("=== transpool ===");
    println!("See demos/ for usage examples");
    println!("Run: cargo run --example basic");
    println!();

    let descriptor = TypeDescriptor::builder("Session")
        .operation("whoami", &[], |session: &mut Session, _| {
            Ok(Value::Int(session.id))
        })
        .operation("close", &[], |_session, _| Ok(Value::Unit))
        .build();

    let pool = Arc::new(FixedPool::new(
        vec![Session { id: 1 }, Session { id: 2 }],
        descriptor,
        PoolConfiguration::default(),
    ));

    println!("Quick Demo:");
    let handler = LeaseHandler::new(pool.clone(), HandlerConfig::default());

    if let Ok(value) = handler.call("whoami", &[]) {
        println!("  Dispatched onto leased session: {:?}", value);
    }
    println!("  Pool available while leased: {}", pool.available_count());

    let _ = handler.call("close", &[]);
    println!("  Pool available after close: {}", pool.available_count());
}
