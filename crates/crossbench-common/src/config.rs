//! Harness configuration with environment variable overrides and
//! validation. Files are read by the front end as part of its own layout.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::Engine;

// ── Errors ──────────────────────────────────────────────────────────

/// Errors produced by configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    #[error("invalid environment variable value for {key}: {value}")]
    InvalidEnvVar { key: String, value: String },
}

/// Floor of one adaptive batch unless configured otherwise.
pub const DEFAULT_MIN_BATCH_TIME: Duration = Duration::from_millis(10);

pub const ENV_WARMUP: &str = "CROSSBENCH_WARMUP";
pub const ENV_ROUNDS: &str = "CROSSBENCH_ROUNDS";
pub const ENV_MIN_BATCH_MS: &str = "CROSSBENCH_MIN_BATCH_MS";
pub const ENV_MAX_BATCH_REPS: &str = "CROSSBENCH_MAX_BATCH_REPS";
pub const ENV_DISABLE_ENGINES: &str = "CROSSBENCH_DISABLE_ENGINES";

/// Every variable [`HarnessConfig::apply_env`] reads.
pub const ENV_VARS: [&str; 5] =
    [ENV_WARMUP, ENV_ROUNDS, ENV_MIN_BATCH_MS, ENV_MAX_BATCH_REPS, ENV_DISABLE_ENGINES];

// ── HarnessConfig ───────────────────────────────────────────────────

/// Measurement settings shared by every run of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Unmeasured priming calls per engine.
    pub warmup: usize,
    /// Measured adaptive batches per engine; the best one is reported.
    pub rounds: usize,
    /// Minimum wall-clock duration of one adaptive batch.
    pub min_batch_time_ms: f64,
    /// Upper bound on calls in one adaptive batch.
    pub max_batch_reps: u64,
    /// Optional engines the loader must leave absent.
    pub disabled_engines: Vec<Engine>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            warmup: 1,
            rounds: 5,
            min_batch_time_ms: 10.0,
            max_batch_reps: 10_000_000,
            disabled_engines: Vec::new(),
        }
    }
}

impl HarnessConfig {
    // ── Environment ─────────────────────────────────────────────

    /// Overlay `CROSSBENCH_*` environment variables onto `self`.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(v) = env::var(ENV_WARMUP) {
            self.warmup = parse_env(ENV_WARMUP, &v)?;
        }
        if let Ok(v) = env::var(ENV_ROUNDS) {
            self.rounds = parse_env(ENV_ROUNDS, &v)?;
        }
        if let Ok(v) = env::var(ENV_MIN_BATCH_MS) {
            self.min_batch_time_ms = parse_env(ENV_MIN_BATCH_MS, &v)?;
        }
        if let Ok(v) = env::var(ENV_MAX_BATCH_REPS) {
            self.max_batch_reps = parse_env(ENV_MAX_BATCH_REPS, &v)?;
        }
        if let Ok(v) = env::var(ENV_DISABLE_ENGINES) {
            self.disabled_engines = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse::<Engine>)
                .collect::<Result<Vec<_>, _>>()?;
        }
        Ok(())
    }

    // ── Validation ──────────────────────────────────────────────

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds == 0 {
            return Err(ConfigError::Validation("rounds must be >= 1".into()));
        }
        if !(self.min_batch_time_ms.is_finite() && self.min_batch_time_ms > 0.0) {
            return Err(ConfigError::Validation(
                "min_batch_time_ms must be a positive number".into(),
            ));
        }
        if self.max_batch_reps == 0 {
            return Err(ConfigError::Validation("max_batch_reps must be >= 1".into()));
        }
        if self.disabled_engines.iter().any(|e| e.is_baseline()) {
            return Err(ConfigError::Validation(
                "the reference engine is the baseline and cannot be disabled".into(),
            ));
        }
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Minimum batch duration; an out-of-range value falls back to the
    /// 10 ms default.
    pub fn min_batch_time(&self) -> Duration {
        Duration::try_from_secs_f64(self.min_batch_time_ms / 1000.0)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or(DEFAULT_MIN_BATCH_TIME)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, val: &str) -> Result<T, ConfigError> {
    val.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnvVar {
        key: key.to_string(),
        value: val.to_string(),
    })
}

#[cfg(test)]
mod tests;
