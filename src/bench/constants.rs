use std::time::Duration;

pub(crate) const DEFAULT_PARALLELISM: usize = 1_usize;
pub(crate) const DEFAULT_WRITE_PERCENT: u8 = 0_u8;
pub(crate) const DEFAULT_DURATION: Duration = Duration::from_secs(5);

pub(crate) const DEFAULT_SWEEP_MAX_PARALLELISM: usize = 10_usize;
pub(crate) const DEFAULT_SWEEP_WRITE_STEP: u8 = 10_u8;

/// Value pushed by benchmark workers.
pub(crate) const PUSHED_VALUE: i64 = 1_i64;
