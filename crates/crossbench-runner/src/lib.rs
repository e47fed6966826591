//! Benchmark runner for crossbench
//!
//! Measures every engine of a [`KernelRegistry`](crossbench_kernels::KernelRegistry)
//! on one case, strictly one engine after another, and reports the best
//! per-call time of each. Failures of a single engine are recorded on its
//! entry and never abort the run.

pub mod parity;
pub mod progress;
pub mod result;
pub mod runner;

pub use parity::{ParityEntry, ParityReport, ParityStatus, verify};
pub use progress::{Phase, ProgressEvent, expected_progress_steps};
pub use result::{BenchmarkResult, ResultEntry, format_time_ms};
pub use runner::{BenchmarkRunner, RunnerConfig, run};
