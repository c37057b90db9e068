//! A hand-written facade: the dispatch front over a lease handler
//!
//! The facade implements the resource's interface with ordinary typed
//! methods and forwards every call into the handler with its signature.
//! Callers never see the pool.

use std::sync::Arc;
use std::time::Duration;

use transpool::{
    FixedPool, HandlerConfig, LeaseHandler, LeaseResult, ParamKind, PoolConfiguration,
    TypeDescriptor, Value,
};

struct Connection {
    endpoint: String,
    sent: u64,
}

fn descriptor() -> Arc<TypeDescriptor<Connection>> {
    TypeDescriptor::builder("Connection")
        .operation("send", &[ParamKind::Bytes], |conn: &mut Connection, args| {
            if let Value::Bytes(payload) = &args[0] {
                conn.sent += payload.len() as u64;
            }
            Ok(Value::Int(conn.sent as i64))
        })
        .operation("endpoint", &[], |conn: &mut Connection, _| {
            Ok(Value::Str(conn.endpoint.clone()))
        })
        .operation("close", &[], |_conn, _| Ok(Value::Unit))
        .build()
}

/// Typed facade over the handler. One of these exists per resource
/// interface; every method routes through `LeaseHandler::invoke`.
struct ConnectionFacade {
    handler: Arc<LeaseHandler<Connection>>,
}

impl ConnectionFacade {
    fn new(handler: Arc<LeaseHandler<Connection>>) -> Self {
        Self { handler }
    }

    fn send(&self, payload: Vec<u8>) -> LeaseResult<i64> {
        match self
            .handler
            .invoke("send", &[ParamKind::Bytes], &[Value::Bytes(payload)])?
        {
            Value::Int(total) => Ok(total),
            _ => Ok(0),
        }
    }

    fn endpoint(&self) -> LeaseResult<String> {
        match self.handler.invoke("endpoint", &[], &[])? {
            Value::Str(endpoint) => Ok(endpoint),
            _ => Ok(String::new()),
        }
    }

    fn close(&self) -> LeaseResult<()> {
        self.handler.invoke("close", &[], &[])?;
        Ok(())
    }
}

fn main() {
    println!("=== transpool - Facade Example ===\n");

    let pool = Arc::new(FixedPool::new(
        vec![
            Connection {
                endpoint: "10.0.0.1:6379".into(),
                sent: 0,
            },
            Connection {
                endpoint: "10.0.0.2:6379".into(),
                sent: 0,
            },
        ],
        descriptor(),
        PoolConfiguration::default(),
    ));

    let handler = Arc::new(LeaseHandler::new(
        pool.clone(),
        HandlerConfig::new().with_staleness_interval(Duration::from_secs(30)),
    ));
    let facade = ConnectionFacade::new(handler);

    // Callers use the typed interface; leasing is invisible
    println!("Connected to: {}", facade.endpoint().unwrap());
    println!("Sent total: {}", facade.send(b"PING".to_vec()).unwrap());
    println!("Sent total: {}", facade.send(b"SET k v".to_vec()).unwrap());

    facade.close().unwrap();
    println!("Closed; pool has {} idle instances", pool.available_count());
}
