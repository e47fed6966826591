//! Checksum parity between every engine and the reference kernels.
//!
//! Runs each kernel once, outside any timed path, so a fast but wrong
//! engine is caught before its timing is trusted.

use std::fmt;

use crossbench_common::{CaseId, Engine, KernelError, Result, lookup};
use crossbench_kernels::{BoundKernel, KernelRegistry};
use serde::Serialize;
use tracing::{debug, warn};

use crate::runner::guarded;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParityStatus {
    Match,
    Mismatch { expected: f64, actual: f64 },
    Skipped { reason: String },
    Failed { reason: String },
}

impl fmt::Display for ParityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParityStatus::Match => write!(f, "match"),
            ParityStatus::Mismatch { expected, actual } => {
                write!(f, "mismatch (expected {expected}, got {actual})")
            }
            ParityStatus::Skipped { reason } => write!(f, "skipped ({reason})"),
            ParityStatus::Failed { reason } => write!(f, "failed ({reason})"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParityEntry {
    pub engine: Engine,
    #[serde(flatten)]
    pub status: ParityStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParityReport {
    pub case_id: CaseId,
    pub param: u32,
    /// Checksum of the reference kernels.
    pub expected: f64,
    pub entries: Vec<ParityEntry>,
}

impl ParityReport {
    /// True when no engine mismatched or failed. Skipped engines do not count.
    pub fn all_match(&self) -> bool {
        self.entries
            .iter()
            .all(|entry| matches!(entry.status, ParityStatus::Match | ParityStatus::Skipped { .. }))
    }

    /// Engines whose checksum differs or which failed to produce one.
    pub fn problems(&self) -> impl Iterator<Item = &ParityEntry> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.status, ParityStatus::Mismatch { .. } | ParityStatus::Failed { .. }))
    }

    pub fn status(&self, engine: Engine) -> Option<&ParityStatus> {
        self.entries.iter().find(|entry| entry.engine == engine).map(|entry| &entry.status)
    }
}

/// Compare every engine's checksum for `case_id` at `param` against the
/// reference kernels.
pub fn verify(registry: &KernelRegistry, case_id: &str, param: u32) -> Result<ParityReport> {
    let case = lookup(case_id)?;
    let expected = oracle(case.id, param);

    let entries = registry
        .iter()
        .map(|(engine, slot)| {
            let status = match slot.provider() {
                None => ParityStatus::Skipped { reason: KernelError::Unavailable.to_string() },
                Some(provider) => match BoundKernel::resolve(provider, case.id) {
                    None => ParityStatus::Skipped { reason: KernelError::FunctionMissing.to_string() },
                    Some(kernel) => check(&kernel, param, expected),
                },
            };
            match &status {
                ParityStatus::Match => debug!(%engine, case = %case.id, param, "checksum matches"),
                ParityStatus::Skipped { .. } => debug!(%engine, %status, "parity skipped"),
                _ => warn!(%engine, case = %case.id, param, %status, "parity check failed"),
            }
            ParityEntry { engine, status }
        })
        .collect();

    Ok(ParityReport { case_id: case.id, param, expected, entries })
}

fn oracle(case: CaseId, param: u32) -> f64 {
    use crossbench_kernels::reference;
    let value = match case {
        CaseId::Fib => reference::fib(param),
        CaseId::PrimeSieve => reference::prime_sieve(param),
        CaseId::ArithLoop => reference::arith_loop(param),
        CaseId::Matmul => reference::matmul(param),
    };
    f64::from(value)
}

fn check(kernel: &BoundKernel<'_>, param: u32, expected: f64) -> ParityStatus {
    match guarded(|| kernel.call(param)) {
        Ok(actual) if !actual.is_finite() => ParityStatus::Failed { reason: KernelError::InvalidResult.to_string() },
        Ok(actual) if actual == expected => ParityStatus::Match,
        Ok(actual) => ParityStatus::Mismatch { expected, actual },
        Err(err) => ParityStatus::Failed { reason: err.to_string() },
    }
}
