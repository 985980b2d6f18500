use log::*;

use super::config::SweepConfig;
use super::driver::{run, Throughput};
use super::errors::BenchResult;

use itertools::iproduct;

///
/// Run the whole parallelism x write percent x stack kind grid.
///
/// Runs are sequential, each against a freshly built stack, in parallelism-major order.
/// `on_result` sees every result as soon as its run finishes, which lets callers stream
/// progress through a sweep that can take many minutes.
pub fn sweep<F>(config: &SweepConfig, mut on_result: F) -> BenchResult<Vec<Throughput>>
where
    F: FnMut(&Throughput),
{
    config.validate()?;

    let write_percents = config.write_percents();
    let grid = iproduct!(
        1..=config.max_parallelism,
        write_percents.iter().copied(),
        config.kinds.iter().copied()
    );

    info!(
        "sweep::max_dop::{}::write_step::{}::kinds::{}",
        config.max_parallelism,
        config.write_step,
        config.kinds.len()
    );

    let mut results = Vec::new();
    for (parallelism, write_percent, kind) in grid {
        let bench = config
            .base
            .clone()
            .with_parallelism(parallelism)
            .with_write_percent(write_percent);

        let result = run(kind, &bench)?;
        on_result(&result);
        results.push(result);
    }

    Ok(results)
}

///
/// Formats streamed sweep results, one line per run with a blank line whenever the
/// parallelism level changes.
#[derive(Debug, Default)]
pub struct SweepReport {
    last_parallelism: Option<usize>,
}

impl SweepReport {
    /// Report that hasn't printed any level yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report line for `result`, led by an empty line when it opens a new parallelism level.
    pub fn line(&mut self, result: &Throughput) -> String {
        let opens_level = self
            .last_parallelism
            .map_or(false, |dop| dop != result.parallelism);
        self.last_parallelism = Some(result.parallelism);

        if opens_level {
            format!("\n{}", result)
        } else {
            result.to_string()
        }
    }
}
