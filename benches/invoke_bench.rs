use criterion::{Criterion, black_box, criterion_group, criterion_main};

use std::sync::Arc;
use std::time::Duration;

use transpool::{
    FixedPool, HandlerConfig, LeaseHandler, ParamKind, PoolConfiguration, TypeDescriptor, Value,
};

struct Conn {
    counter: i64,
}

fn descriptor() -> Arc<TypeDescriptor<Conn>> {
    TypeDescriptor::builder("Conn")
        .operation("bump", &[], |conn: &mut Conn, _| {
            conn.counter += 1;
            Ok(Value::Int(conn.counter))
        })
        .operation("echo", &[ParamKind::Str], |_conn, args| Ok(args[0].clone()))
        .operation("close", &[], |_conn, _| Ok(Value::Unit))
        .build()
}

fn handler() -> LeaseHandler<Conn> {
    let pool = Arc::new(FixedPool::new(
        vec![Conn { counter: 0 }],
        descriptor(),
        PoolConfiguration::default(),
    ));
    LeaseHandler::new(
        pool,
        HandlerConfig::new().with_staleness_interval(Duration::from_secs(3600)),
    )
}

fn bench_invoke_cached(c: &mut Criterion) {
    let handler = handler();
    // Warm the lease and the resolution cache
    handler.call("bump", &[]).unwrap();

    c.bench_function("invoke_cached_no_args", |b| {
        b.iter(|| black_box(handler.call("bump", &[]).unwrap()))
    });
}

fn bench_invoke_with_args(c: &mut Criterion) {
    let handler = handler();
    let args = [Value::from("payload")];
    handler.invoke("echo", &[ParamKind::Str], &args).unwrap();

    c.bench_function("invoke_cached_str_arg", |b| {
        b.iter(|| {
            black_box(
                handler
                    .invoke("echo", &[ParamKind::Str], black_box(&args))
                    .unwrap(),
            )
        })
    });
}

fn bench_lease_cycle(c: &mut Criterion) {
    let handler = handler();

    c.bench_function("call_then_close_cycle", |b| {
        b.iter(|| {
            handler.call("bump", &[]).unwrap();
            handler.call("close", &[]).unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_invoke_cached,
    bench_invoke_with_args,
    bench_lease_cycle
);
criterion_main!(benches);
