//! Benchmark results and the helpers front ends use to present them.

use crossbench_common::{CaseId, Engine, KernelError};
use serde::Serialize;

/// Outcome of one engine in one run.
///
/// `time_ms` is the best per-call time in milliseconds, or NaN when the
/// engine failed; `error` then holds the reason.
#[derive(Debug, Clone, Serialize)]
pub struct ResultEntry {
    pub engine: Engine,
    pub time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Value returned by the last call of the last round.
    pub checksum: Option<f64>,
    /// Per-call time of each measured round, in order.
    pub round_times_ms: Vec<f64>,
}

impl ResultEntry {
    pub fn failed(engine: Engine, error: &KernelError) -> Self {
        Self {
            engine,
            time_ms: f64::NAN,
            error: Some(error.to_string()),
            checksum: None,
            round_times_ms: Vec::new(),
        }
    }

    pub fn measured(engine: Engine, time_ms: f64, checksum: Option<f64>, round_times_ms: Vec<f64>) -> Self {
        Self { engine, time_ms, error: None, checksum, round_times_ms }
    }

    /// Whether the entry carries a usable time.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.time_ms.is_finite()
    }

    pub fn is_unavailable(&self) -> bool {
        self.error.as_deref() == Some(UNAVAILABLE)
    }
}

const UNAVAILABLE: &str = "not available";

/// All entries of one run, one per known engine in fixed order.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub case_id: CaseId,
    pub param: u32,
    pub results: Vec<ResultEntry>,
}

impl BenchmarkResult {
    pub fn entry(&self, engine: Engine) -> Option<&ResultEntry> {
        self.results.iter().find(|entry| entry.engine == engine)
    }

    pub fn baseline(&self) -> Option<&ResultEntry> {
        self.results.iter().find(|entry| entry.engine.is_baseline())
    }

    /// Entry with the lowest finite time, if any engine succeeded.
    pub fn fastest(&self) -> Option<&ResultEntry> {
        self.results
            .iter()
            .filter(|entry| entry.is_success())
            .min_by(|a, b| a.time_ms.total_cmp(&b.time_ms))
    }

    /// `fastest / entry`: 1.0 for the fastest engine, below 1.0 for slower ones.
    pub fn relative_speed(&self, entry: &ResultEntry) -> Option<f64> {
        let fastest = self.fastest()?;
        entry.is_success().then(|| fastest.time_ms / entry.time_ms)
    }

    /// `baseline / entry`: how many times faster than the baseline engine.
    pub fn speedup_vs_baseline(&self, entry: &ResultEntry) -> Option<f64> {
        let baseline = self.baseline().filter(|b| b.is_success())?;
        entry.is_success().then(|| baseline.time_ms / entry.time_ms)
    }

    pub fn unavailable_engines(&self) -> Vec<Engine> {
        self.results.iter().filter(|entry| entry.is_unavailable()).map(|entry| entry.engine).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ResultEntry> {
        self.results.iter().filter(|entry| entry.error.is_some())
    }
}

/// Human-readable per-call time: `-` for missing values, milliseconds down
/// to 0.1 ms, microseconds below that.
pub fn format_time_ms(ms: f64) -> String {
    if !ms.is_finite() {
        return "-".to_string();
    }
    if ms >= 0.1 {
        return format!("{ms:.2} ms");
    }
    let us = ms * 1000.0;
    if us < 10.0 { format!("{us:.2} µs") } else { format!("{us:.1} µs") }
}
