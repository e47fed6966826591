//! Common types, traits, and utilities for crossbench
//!
//! This crate provides the foundational types shared by the kernels, the
//! runner and the CLI: the benchmark case catalog, the engine names,
//! configuration and error handling.

pub mod case;
pub mod config;
pub mod engine;
pub mod error;

pub use case::{CASES, Case, CaseId, MODULUS, lookup};
pub use config::{ConfigError, DEFAULT_MIN_BATCH_TIME, HarnessConfig};
pub use engine::Engine;
pub use error::{BenchError, KernelError, KernelResult, Result};
