use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use stackbench::sync::prelude::*;

use rand::prelude::*;
use rand_distr::Pareto;
use std::sync::Arc;

const OPS_PER_THREAD: usize = 1_000;

fn seeded(kind: StackKind) -> Arc<dyn ConcurrentStack> {
    let stack = kind.build(RetryPolicy::Spin);
    for i in 0..1_024 {
        stack.push(i);
    }
    stack
}

fn pure_read(stack: Arc<dyn ConcurrentStack>, thread_count: u64) {
    let mut threads = vec![];

    for thread_no in 0..thread_count {
        let stack = stack.clone();

        let t = std::thread::Builder::new()
            .name(format!("t_{}", thread_no))
            .spawn(move || {
                for _ in 0..OPS_PER_THREAD {
                    stack.peek();
                }
            })
            .unwrap();

        threads.push(t);
    }

    for t in threads.into_iter() {
        t.join().unwrap();
    }
}

fn bench_pure_reads(c: &mut Criterion) {
    let threads = 8;

    let mut group = c.benchmark_group("stack_read_throughput");
    group.throughput(Throughput::Elements(threads * OPS_PER_THREAD as u64));
    for kind in StackKind::ALL.iter() {
        let stack = seeded(*kind);
        group.bench_function(format!("{} pure reads", kind), move |b| {
            b.iter_batched(
                || stack.clone(),
                |stack| pure_read(stack, threads),
                BatchSize::SmallInput,
            )
        });
    }
}

////////////////////////////////

fn rw_pareto(stack: Arc<dyn ConcurrentStack>, dist: f64, thread_count: u64) {
    let mut threads = vec![];

    for thread_no in 0..thread_count {
        let stack = stack.clone();

        let t = std::thread::Builder::new()
            .name(format!("t_{}", thread_no))
            .spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    if dist < 0.8_f64 {
                        stack.peek();
                    } else if i % 2 == 0 {
                        stack.push(i as i64);
                    } else {
                        stack.pop();
                    }
                }
            })
            .unwrap();

        threads.push(t);
    }

    for t in threads.into_iter() {
        t.join().unwrap();
    }
}

fn bench_rw_pareto(c: &mut Criterion) {
    let threads = 8;

    let mut group = c.benchmark_group("stack_rw_pareto_throughput");
    group.throughput(Throughput::Elements(threads * OPS_PER_THREAD as u64));
    for kind in StackKind::ALL.iter() {
        let stack = seeded(*kind);
        group.bench_function(format!("{} rw_pareto", kind), move |b| {
            b.iter_batched(
                || {
                    let dist: f64 =
                        1. / thread_rng().sample(Pareto::new(1., 5.0_f64.log(4.0_f64)).unwrap());
                    (stack.clone(), dist)
                },
                |vars| rw_pareto(vars.0, vars.1, threads),
                BatchSize::SmallInput,
            )
        });
    }
}

////////////////////////////////

fn pure_writes(stack: Arc<dyn ConcurrentStack>, thread_count: u64) {
    let mut threads = vec![];

    for thread_no in 0..thread_count {
        let stack = stack.clone();

        let t = std::thread::Builder::new()
            .name(format!("t_{}", thread_no))
            .spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    stack.push(thread_no as i64);
                    if i % 2 == 1 {
                        stack.pop();
                    }
                }
            })
            .unwrap();

        threads.push(t);
    }

    for t in threads.into_iter() {
        t.join().unwrap();
    }
}

fn bench_pure_writes(c: &mut Criterion) {
    let threads = 8;

    let mut group = c.benchmark_group("stack_write_throughput");
    group.throughput(Throughput::Elements(threads * OPS_PER_THREAD as u64));
    for kind in StackKind::ALL.iter() {
        for retry in [RetryPolicy::Spin, RetryPolicy::Backoff].iter() {
            if *kind == StackKind::Locked && *retry == RetryPolicy::Backoff {
                continue;
            }
            group.bench_function(format!("{} {} pure writes", kind, retry), move |b| {
                b.iter_batched(
                    || kind.build(*retry),
                    |stack| pure_writes(stack, threads),
                    BatchSize::SmallInput,
                )
            });
        }
    }
}

criterion_group! {
    name = stack_benches;
    config = Criterion::default();
    targets = bench_pure_reads, bench_rw_pareto, bench_pure_writes
}
criterion_main!(stack_benches);
