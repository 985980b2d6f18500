use std::io;
use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Parallelism must be at least 1")]
    ZeroParallelism,
    #[error("Write percent must be within 0..=100, got: {0}")]
    WritePercentOutOfRange(u8),
    #[error("Write percent step must be within 1..=100, got: {0}")]
    WriteStepOutOfRange(u8),
    #[error("Worker spawn failed: {0}")]
    Spawn(#[from] io::Error),
    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),
    #[error("Self-check {scenario} failed: expected {expected}, received {actual}")]
    Mismatch {
        scenario: &'static str,
        expected: i64,
        actual: i64,
    },
}

pub type BenchResult<T> = result::Result<T, BenchError>;
