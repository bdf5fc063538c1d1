use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_ioc::*;
use std::sync::Arc;

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let container = Container::new();
    container.singleton_factory("answer", |_, _| Ok(42u64));

    // Prime the singleton
    let _ = container.get::<u64>("answer").unwrap();

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = container.get::<u64>("answer").unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    c.bench_function("singleton_cold_expensive", |b| {
        b.iter_batched(
            || {
                let container = Container::new();
                container.singleton_factory("expensive", |_, _| {
                    Ok(ExpensiveToCreate { data: (0..1000).collect() })
                });
                container
            },
            |container| {
                let v = container.get::<ExpensiveToCreate>("expensive").unwrap();
                black_box(v.data.len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_factory_vs_constructor(c: &mut Criterion) {
    struct Transport;
    struct Mailer {
        _transport: Arc<Transport>,
    }

    let mut group = c.benchmark_group("factory_vs_constructor");

    let mut types = TypeRegistry::new();
    types.register(TypeDescriptor::new("Transport", |_| Ok(Transport)));
    types.register(
        TypeDescriptor::new("Mailer", |args| Ok(Mailer { _transport: args.get::<Transport>(0)? }))
            .param(ParameterDescriptor::typed("transport", "Transport")),
    );
    let container = Container::with_types(types);
    container.bind_factory(
        "mailer",
        |ctx, _| Ok(Mailer { _transport: ctx.get::<Transport>("Transport")? }),
        false,
    );

    group.bench_function("factory", |b| {
        b.iter(|| black_box(container.resolve("mailer", &[]).unwrap()))
    });
    group.bench_function("constructor", |b| {
        b.iter(|| black_box(container.resolve("Mailer", &[]).unwrap()))
    });

    group.finish();
}

fn bench_alias_chain_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("alias_chain");

    for &depth in &[1usize, 8, 64] {
        let container = Container::new();
        for i in 0..depth {
            container.bind(format!("id{}", i), Some(format!("id{}", i + 1).as_str()), false);
        }
        container.bind_factory(format!("id{}", depth), |_, _| Ok(1u8), false);

        group.bench_with_input(BenchmarkId::new("resolve", depth), &depth, |b, _| {
            b.iter(|| black_box(container.resolve("id0", &[]).unwrap()))
        });
    }

    group.finish();
}

fn bench_callback_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("callbacks");

    for &count in &[0usize, 1, 8] {
        let container = Container::new();
        container.bind_factory("foo", |_, _| Ok(0u64), false);
        for i in 0..count {
            container.on_resolving(|_| None, i as i32);
        }

        group.bench_with_input(BenchmarkId::new("transient_with_callbacks", count), &count, |b, _| {
            b.iter(|| black_box(container.resolve("foo", &[]).unwrap()))
        });
    }

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");

    let container = Container::new();
    container.singleton_factory("answer", |_, _| Ok(42u64));

    // Prime the singleton
    let _ = container.get::<u64>("answer").unwrap();

    for &thread_count in &[1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("singleton_threads", thread_count),
            &thread_count,
            |b, &threads| {
                b.iter_custom(|iters| {
                    let start = std::time::Instant::now();
                    crossbeam_utils::thread::scope(|s| {
                        for _ in 0..threads {
                            let container_ref = &container;
                            s.spawn(move |_| {
                                for _ in 0..iters / threads as u64 {
                                    let v = container_ref.get::<u64>("answer").unwrap();
                                    black_box(v);
                                }
                            });
                        }
                    })
                    .unwrap();
                    start.elapsed()
                })
            },
        );
    }

    group.finish();
}

// ===== Macro Benchmarks =====

fn bench_large_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_registry");

    for &binding_count in &[10, 100, 1000] {
        let container = Container::new();
        container.singleton_factory("baseline", |_, _| Ok(42u64));

        for i in 0..binding_count {
            let value = i as u32;
            container.bind_factory(format!("service{}", i), move |_, _| Ok(value), true);
        }

        group.bench_with_input(
            BenchmarkId::new("resolve_from_large_registry", binding_count),
            &binding_count,
            |b, _| {
                b.iter(|| {
                    let v = container.get::<u64>("baseline").unwrap();
                    black_box(v);
                })
            },
        );
    }

    group.finish();
}

fn bench_mixed_workload(c: &mut Criterion) {
    // Simulate realistic workload: 70% singleton hits, 20% aliases, 10% constructed
    struct SingletonService(u64);
    struct TransientService(u64);

    let mut types = TypeRegistry::new();
    types.register(TypeDescriptor::new("TransientService", |_| Ok(TransientService(3))));
    let container = Container::with_types(types);
    container.singleton_factory("singleton", |_, _| Ok(SingletonService(1)));
    container.bind("alias", Some("singleton"), false);

    // Prime services
    let _ = container.get::<SingletonService>("singleton").unwrap();

    c.bench_function("mixed_workload_realistic", |b| {
        b.iter(|| {
            // 70% singleton hits
            for _ in 0..7 {
                let v = container.get::<SingletonService>("singleton").unwrap();
                black_box(v.0);
            }

            // 20% aliases
            for _ in 0..2 {
                let v = container.get::<SingletonService>("alias").unwrap();
                black_box(v.0);
            }

            // 10% constructed
            let v = container.get::<TransientService>("TransientService").unwrap();
            black_box(v.0);
        })
    });
}

criterion_group!(
    micro_benches,
    bench_singleton_hit,
    bench_singleton_cold,
    bench_factory_vs_constructor,
    bench_alias_chain_depth,
    bench_callback_overhead,
    bench_contention
);

criterion_group!(macro_benches, bench_large_registry, bench_mixed_workload);

criterion_main!(micro_benches, macro_benches);
