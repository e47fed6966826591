//! Error types for crossbench
//!
//! Two layers: [`BenchError`] is what a caller of the harness can see (only
//! caller-contract violations), [`KernelError`] is what a single engine can
//! produce. Kernel errors never escape the runner; their `Display` text
//! becomes the failure note on that engine's result entry.

use thiserror::Error;

/// Errors surfaced to the caller of a benchmark or parity run.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("unknown benchmark case: {0}")]
    CaseNotFound(String),
}

/// Failure of one engine on one case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("not available")]
    Unavailable,

    #[error("function missing")]
    FunctionMissing,

    #[error("invalid result")]
    InvalidResult,

    #[error("{reason}")]
    ExecutionFailed { reason: String },

    #[error("kernel panicked: {0}")]
    Panicked(String),
}

impl KernelError {
    /// Shorthand for [`KernelError::ExecutionFailed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::ExecutionFailed { reason: reason.into() }
    }

    /// Build a [`KernelError::Panicked`] from a `catch_unwind` payload.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::Panicked(message)
    }
}

pub type Result<T, E = BenchError> = std::result::Result<T, E>;

/// Result of one kernel invocation: the checksum or the engine's failure.
pub type KernelResult = std::result::Result<f64, KernelError>;
