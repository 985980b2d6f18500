//! stackbench: race the locked and lock-free stacks.
//!
//! ```bash
//! stackbench --unit-test
//! stackbench --dop 4 --write-percent 20 --duration 5
//! stackbench --full-benchmark --duration 1
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use stackbench::prelude::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StackChoice {
    Both,
    LockFree,
    Locked,
}

impl StackChoice {
    fn kinds(self) -> Vec<StackKind> {
        match self {
            StackChoice::Both => StackKind::ALL.to_vec(),
            StackChoice::LockFree => vec![StackKind::LockFree],
            StackChoice::Locked => vec![StackKind::Locked],
        }
    }
}

/// Unit tests and throughput benchmarks for the concurrent stacks.
#[derive(Parser, Debug)]
#[command(name = "stackbench")]
struct Cli {
    /// Run the correctness scenarios instead of benchmarking.
    #[arg(long, alias = "unitTest", conflicts_with = "full_benchmark")]
    unit_test: bool,

    /// Degree of parallelism: number of worker threads.
    #[arg(long, default_value_t = 1)]
    dop: usize,

    /// Percent of operations that are pushes or pops, the rest are peeks.
    #[arg(long, alias = "writePercent", default_value_t = 0)]
    write_percent: u8,

    /// Benchmark duration in seconds, per run.
    #[arg(long, default_value_t = 5)]
    duration: u64,

    /// Sweep parallelism and write percent instead of a single run.
    #[arg(long, alias = "fullBenchmark")]
    full_benchmark: bool,

    /// Highest parallelism visited by the full benchmark.
    #[arg(long, default_value_t = 10)]
    max_dop: usize,

    /// Write percent increment of the full benchmark.
    #[arg(long, default_value_t = 10)]
    write_step: u8,

    /// Which stacks to exercise.
    #[arg(long, value_enum, default_value_t = StackChoice::Both)]
    stack: StackChoice,

    /// Back off between lost CAS races in the lock-free stack (default: retry immediately).
    #[arg(long)]
    backoff: bool,

    /// Seed for the workers' operation mix (random if not set).
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn retry(&self) -> RetryPolicy {
        if self.backoff {
            RetryPolicy::Backoff
        } else {
            RetryPolicy::Spin
        }
    }

    fn bench_config(&self) -> BenchConfig {
        let config = BenchConfig::default()
            .with_parallelism(self.dop)
            .with_write_percent(self.write_percent)
            .with_duration(Duration::from_secs(self.duration))
            .with_retry(self.retry());

        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!("{:?}", cli);

    let kinds = cli.stack.kinds();

    if cli.unit_test {
        selfcheck_kinds(&kinds, cli.retry()).context("unit tests failed")?;
        println!("{}", SELFCHECK_PASSED);
    } else if cli.full_benchmark {
        let config = SweepConfig::default()
            .with_max_parallelism(cli.max_dop)
            .with_write_step(cli.write_step)
            .with_kinds(kinds)
            .with_base(cli.bench_config());

        let mut report = SweepReport::new();
        sweep(&config, |result| println!("{}", report.line(result)))
        .context("full benchmark failed")?;
        println!();
    } else {
        let config = cli.bench_config();
        for kind in kinds {
            let result = run(kind, &config)
                .with_context(|| format!("{} benchmark failed", kind))?;
            println!("{}", result.summary());
        }
    }

    Ok(())
}
