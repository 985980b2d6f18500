use super::constants::*;
use super::errors::{BenchError, BenchResult};
use crate::sync::prelude::*;

use std::time::Duration;

///
/// Parameters of a single timed benchmark run.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Number of concurrent workers hammering the stack.
    pub parallelism: usize,
    /// Chance, in percent, that an operation is a push or pop rather than a peek.
    pub write_percent: u8,
    /// Wall-clock time before workers are told to stop.
    pub duration: Duration,
    /// Lost-race behavior of the lock-free stack.
    pub retry: RetryPolicy,
    /// Base seed for the per-worker generators. Random when unset.
    pub seed: Option<u64>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
            write_percent: DEFAULT_WRITE_PERCENT,
            duration: DEFAULT_DURATION,
            retry: RetryPolicy::default(),
            seed: None,
        }
    }
}

impl BenchConfig {
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_write_percent(mut self, write_percent: u8) -> Self {
        self.write_percent = write_percent;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.parallelism == 0 {
            return Err(BenchError::ZeroParallelism);
        }
        if self.write_percent > 100 {
            return Err(BenchError::WritePercentOutOfRange(self.write_percent));
        }
        Ok(())
    }
}

///
/// Grid of runs: every parallelism level from 1 up to `max_parallelism`, crossed with every
/// write percent from 0 to 100 in `write_step` increments, for each stack kind.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub max_parallelism: usize,
    pub write_step: u8,
    pub kinds: Vec<StackKind>,
    /// Duration, retry policy and seed shared by every run of the grid.
    pub base: BenchConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_parallelism: DEFAULT_SWEEP_MAX_PARALLELISM,
            write_step: DEFAULT_SWEEP_WRITE_STEP,
            kinds: StackKind::ALL.to_vec(),
            base: BenchConfig::default(),
        }
    }
}

impl SweepConfig {
    pub fn with_max_parallelism(mut self, max_parallelism: usize) -> Self {
        self.max_parallelism = max_parallelism;
        self
    }

    pub fn with_write_step(mut self, write_step: u8) -> Self {
        self.write_step = write_step;
        self
    }

    pub fn with_kinds(mut self, kinds: Vec<StackKind>) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn with_base(mut self, base: BenchConfig) -> Self {
        self.base = base;
        self
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.max_parallelism == 0 {
            return Err(BenchError::ZeroParallelism);
        }
        if self.write_step == 0 || self.write_step > 100 {
            return Err(BenchError::WriteStepOutOfRange(self.write_step));
        }
        Ok(())
    }

    /// Write percents visited by the sweep, always starting at 0.
    pub fn write_percents(&self) -> Vec<u8> {
        (0..=100_u8).step_by(self.write_step.max(1) as usize).collect()
    }
}
