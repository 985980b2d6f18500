mod constants;

/// Benchmark and sweep configuration
pub mod config;
/// Timed multi-worker throughput runs
pub mod driver;
/// Benchmark driver errors
pub mod errors;
/// Sequential correctness scenarios
pub mod selfcheck;
/// Parallelism and write mix grid runs
pub mod sweep;

/// Prelude of the benchmark driver
pub mod prelude {
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::errors::*;
    pub use super::selfcheck::*;
    pub use super::sweep::*;
}
