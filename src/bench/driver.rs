use log::*;

use super::config::BenchConfig;
use super::constants::PUSHED_VALUE;
use super::errors::{BenchError, BenchResult};
use crate::sync::prelude::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

///
/// Aggregated outcome of one benchmark run.
#[derive(Debug, Clone)]
pub struct Throughput {
    pub kind: StackKind,
    pub parallelism: usize,
    pub write_percent: u8,
    pub retry: RetryPolicy,
    /// Operations completed by all workers together.
    pub ops: u64,
    /// Time between spawning the first worker and joining the last one.
    pub elapsed: Duration,
}

impl Throughput {
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0_f64 {
            self.ops as f64 / secs
        } else {
            0_f64
        }
    }

    ///
    /// Single-run report line: `<kind> throughput: <ops>`, tagged like [Display](fmt::Display).
    pub fn summary(&self) -> String {
        format!("{} throughput: {}{}", self.kind, self.ops, self.retry_tag())
    }

    // Results under backoff aren't comparable to the baseline busy-retry numbers.
    fn retry_tag(&self) -> &'static str {
        if self.kind == StackKind::LockFree && self.retry == RetryPolicy::Backoff {
            " (backoff)"
        } else {
            ""
        }
    }
}

impl fmt::Display for Throughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, dop: {}, writePercent: {}, throughput: {}{}",
            self.kind,
            self.parallelism,
            self.write_percent,
            self.ops,
            self.retry_tag()
        )
    }
}

///
/// Build a fresh stack of `kind` and benchmark it with `config`.
pub fn run(kind: StackKind, config: &BenchConfig) -> BenchResult<Throughput> {
    let stack = kind.build(config.retry);
    let (ops, elapsed) = benchmark(stack, config)?;

    Ok(Throughput {
        kind,
        parallelism: config.parallelism,
        write_percent: config.write_percent,
        retry: config.retry,
        ops,
        elapsed,
    })
}

///
/// Hammer `stack` from `config.parallelism` workers for `config.duration`.
///
/// Each worker picks a write with probability `write_percent` and a peek otherwise. A write
/// is a coin flip between push and pop, but a worker only pops while it has pushes of its own
/// outstanding, so benchmark pops never hit an empty stack. Workers check a shared stop flag
/// between operations.
///
/// Returns the summed operation count and the elapsed wall-clock time.
pub fn benchmark(
    stack: Arc<dyn ConcurrentStack>,
    config: &BenchConfig,
) -> BenchResult<(u64, Duration)> {
    config.validate()?;

    let stop = Arc::new(AtomicBool::new(false));
    let started = Instant::now();
    let mut workers: Vec<(String, JoinHandle<u64>)> = Vec::with_capacity(config.parallelism);

    for worker_no in 0..config.parallelism {
        let name = format!("t_{}", worker_no);
        let stack = stack.clone();
        let stop_flag = stop.clone();
        let write_percent = config.write_percent;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(worker_no as u64)),
            None => StdRng::from_entropy(),
        };

        let spawned = thread::Builder::new()
            .name(name.clone())
            .spawn(move || worker(stack, stop_flag, write_percent, rng));

        match spawned {
            Ok(handle) => workers.push((name, handle)),
            Err(e) => {
                error!("spawn::{}::{}", name, e);
                stop.store(true, Ordering::Release);
                join_all(workers)?;
                return Err(BenchError::Spawn(e));
            }
        }
    }

    debug!("spawned::{}::workers", workers.len());

    thread::sleep(config.duration);
    stop.store(true, Ordering::Release);

    let ops = join_all(workers)?;
    let elapsed = started.elapsed();

    info!(
        "benchmark::dop::{}::write_percent::{}::ops::{}::elapsed::{:?}",
        config.parallelism, config.write_percent, ops, elapsed
    );

    Ok((ops, elapsed))
}

fn join_all(workers: Vec<(String, JoinHandle<u64>)>) -> BenchResult<u64> {
    let mut total = 0_u64;
    let mut panicked = None;

    // Join everything before reporting, no worker is left running.
    for (name, handle) in workers {
        match handle.join() {
            Ok(ops) => {
                trace!("joined::{}::ops::{}", name, ops);
                total = total.saturating_add(ops);
            }
            Err(_) => {
                warn!("worker {} panicked", name);
                if panicked.is_none() {
                    panicked = Some(name);
                }
            }
        }
    }

    match panicked {
        Some(name) => Err(BenchError::WorkerPanicked(name)),
        None => Ok(total),
    }
}

fn worker(
    stack: Arc<dyn ConcurrentStack>,
    stop: Arc<AtomicBool>,
    write_percent: u8,
    mut rng: StdRng,
) -> u64 {
    let mut ops = 0_u64;
    // Pushes made by this worker that it hasn't popped back yet.
    let mut outstanding = 0_u64;

    while !stop.load(Ordering::Acquire) {
        // Draw even at 0% and 100% writes to keep per-op cost uniform.
        let roll: u8 = rng.gen_range(0..100);

        if roll < write_percent {
            if rng.gen::<bool>() && outstanding > 0 {
                stack.pop();
                outstanding -= 1;
            } else {
                stack.push(PUSHED_VALUE);
                outstanding += 1;
            }
        } else {
            stack.peek();
        }

        ops += 1;
    }

    ops
}
