//! Sequential benchmark runner.
//!
//! For each engine in registry order: warmup calls, then measured rounds.
//! A round is an adaptive batch that calls the kernel until the batch has
//! run for at least `min_batch_time` (or hit `max_batch_reps`) and divides
//! the elapsed time by the call count. The engine's reported time is the
//! minimum over its rounds.
//!
//! The runner yields to the async runtime exactly once before every warmup
//! call and every round; nothing yields inside a timed batch.

use std::hint::black_box;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crossbench_common::{CaseId, DEFAULT_MIN_BATCH_TIME, Engine, HarnessConfig, KernelError, Result, lookup};
use crossbench_kernels::{BoundKernel, EngineSlot, KernelRegistry};
use tracing::{debug, info, warn};

use crate::progress::{Phase, ProgressEvent};
use crate::result::{BenchmarkResult, ResultEntry};

/// Timing parameters of the adaptive batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunnerConfig {
    pub min_batch_time: Duration,
    pub max_batch_reps: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { min_batch_time: DEFAULT_MIN_BATCH_TIME, max_batch_reps: 10_000_000 }
    }
}

/// Unvalidated settings are clamped: an unusable batch time becomes the
/// default and a zero repetition cap becomes one.
impl From<&HarnessConfig> for RunnerConfig {
    fn from(config: &HarnessConfig) -> Self {
        Self { min_batch_time: config.min_batch_time(), max_batch_reps: config.max_batch_reps.max(1) }
    }
}

/// Run `case_id` on every engine of `registry` with the default timing
/// parameters.
///
/// Fails only when `case_id` is not in the catalog; every engine-level
/// failure is recorded on that engine's entry instead.
pub async fn run(
    registry: &KernelRegistry,
    case_id: &str,
    param: u32,
    warmup: usize,
    rounds: usize,
    on_progress: Option<&mut dyn FnMut(ProgressEvent)>,
) -> Result<BenchmarkResult> {
    BenchmarkRunner::new(registry).run(case_id, param, warmup, rounds, on_progress).await
}

/// Runner bound to one registry for the length of a session.
#[derive(Debug)]
pub struct BenchmarkRunner<'r> {
    registry: &'r KernelRegistry,
    config: RunnerConfig,
}

struct Measurement {
    best_ms: f64,
    checksum: Option<f64>,
    round_times_ms: Vec<f64>,
}

struct Batch {
    per_call_ms: f64,
    reps: u64,
    last: f64,
}

struct Progress<'a> {
    sink: Option<&'a mut dyn FnMut(ProgressEvent)>,
}

impl Progress<'_> {
    fn emit(&mut self, event: ProgressEvent) {
        if let Some(sink) = &mut self.sink {
            sink(event);
        }
    }
}

impl<'r> BenchmarkRunner<'r> {
    pub fn new(registry: &'r KernelRegistry) -> Self {
        Self { registry, config: RunnerConfig::default() }
    }

    #[must_use]
    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub async fn run(
        &self,
        case_id: &str,
        param: u32,
        warmup: usize,
        rounds: usize,
        on_progress: Option<&mut dyn FnMut(ProgressEvent)>,
    ) -> Result<BenchmarkResult> {
        let case = lookup(case_id)?;
        info!(case = %case.id, param, warmup, rounds, "starting benchmark run");

        let mut progress = Progress { sink: on_progress };
        let mut results = Vec::with_capacity(Engine::ALL.len());
        for (engine, slot) in self.registry.iter() {
            let entry = self.run_engine(engine, slot, case.id, param, warmup, rounds, &mut progress).await;
            results.push(entry);
        }

        Ok(BenchmarkResult { case_id: case.id, param, results })
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_engine(
        &self,
        engine: Engine,
        slot: &EngineSlot,
        case: CaseId,
        param: u32,
        warmup: usize,
        rounds: usize,
        progress: &mut Progress<'_>,
    ) -> ResultEntry {
        let Some(provider) = slot.provider() else {
            debug!(%engine, "skipping absent engine");
            return ResultEntry::failed(engine, &KernelError::Unavailable);
        };
        let Some(kernel) = BoundKernel::resolve(provider, case) else {
            debug!(%engine, %case, "engine does not provide this kernel");
            return ResultEntry::failed(engine, &KernelError::FunctionMissing);
        };

        match self.measure(engine, kernel, param, warmup, rounds, progress).await {
            Ok(m) => {
                debug!(%engine, best_ms = m.best_ms, "engine measured");
                ResultEntry::measured(engine, m.best_ms, m.checksum, m.round_times_ms)
            }
            Err(err) => {
                warn!(%engine, %case, error = %err, "engine failed; continuing with the next one");
                ResultEntry::failed(engine, &err)
            }
        }
    }

    async fn measure(
        &self,
        engine: Engine,
        kernel: BoundKernel<'_>,
        param: u32,
        warmup: usize,
        rounds: usize,
        progress: &mut Progress<'_>,
    ) -> std::result::Result<Measurement, KernelError> {
        for current in 1..=warmup {
            tokio::task::yield_now().await;
            guarded(|| kernel.call(black_box(param)))?;
            progress.emit(ProgressEvent { engine, phase: Phase::Warmup, current, total: warmup });
        }

        // stays infinite when no round is requested
        let mut best_ms = f64::INFINITY;
        let mut checksum = None;
        let mut round_times_ms = Vec::with_capacity(rounds);
        for current in 1..=rounds {
            tokio::task::yield_now().await;
            let batch = guarded(|| self.batch(&kernel, param))?;
            if !batch.last.is_finite() {
                return Err(KernelError::InvalidResult);
            }
            debug!(%engine, round = current, reps = batch.reps, per_call_ms = batch.per_call_ms, "round complete");

            best_ms = best_ms.min(batch.per_call_ms);
            checksum = Some(batch.last);
            round_times_ms.push(batch.per_call_ms);
            progress.emit(ProgressEvent { engine, phase: Phase::Round, current, total: rounds });
        }

        Ok(Measurement { best_ms, checksum, round_times_ms })
    }

    fn batch(&self, kernel: &BoundKernel<'_>, param: u32) -> std::result::Result<Batch, KernelError> {
        let mut reps = 0u64;
        let start = Instant::now();
        loop {
            let last = black_box(kernel.call(black_box(param))?);
            reps += 1;
            let elapsed = start.elapsed();
            if elapsed >= self.config.min_batch_time || reps >= self.config.max_batch_reps {
                let per_call_ms = elapsed.as_secs_f64() * 1000.0 / reps as f64;
                return Ok(Batch { per_call_ms, reps, last });
            }
        }
    }
}

/// Run `f`, turning a panic into [`KernelError::Panicked`].
pub(crate) fn guarded<T>(
    f: impl FnOnce() -> std::result::Result<T, KernelError>,
) -> std::result::Result<T, KernelError> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Err(KernelError::from_panic(payload)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_follows_harness_settings() {
        let harness = HarnessConfig { min_batch_time_ms: 2.0, max_batch_reps: 50, ..HarnessConfig::default() };
        let config = RunnerConfig::from(&harness);
        assert_eq!(config.min_batch_time, Duration::from_millis(2));
        assert_eq!(config.max_batch_reps, 50);
        assert_eq!(RunnerConfig::from(&HarnessConfig::default()), RunnerConfig::default());
    }

    #[test]
    fn unvalidated_batch_time_falls_back_to_default() {
        for min_batch_time_ms in [-5.0, f64::NAN, f64::INFINITY, 1e300] {
            let harness = HarnessConfig { min_batch_time_ms, max_batch_reps: 0, ..HarnessConfig::default() };
            let config = RunnerConfig::from(&harness);
            assert_eq!(config.min_batch_time, DEFAULT_MIN_BATCH_TIME);
            assert_eq!(config.max_batch_reps, 1);
        }
    }

    #[test]
    fn guarded_converts_panics() {
        let err = guarded::<f64>(|| panic!("kernel blew up")).unwrap_err();
        assert_eq!(err, KernelError::Panicked("kernel blew up".into()));
        assert_eq!(guarded(|| Ok(3.0)), Ok(3.0));
    }

    #[tokio::test]
    async fn repetition_cap_bounds_the_batch() {
        let registry = KernelRegistry::new();
        let runner = BenchmarkRunner::new(&registry)
            .with_config(RunnerConfig { min_batch_time: Duration::from_secs(3600), max_batch_reps: 3 });
        let result = runner.run("fib", 10, 0, 2, None).await.unwrap();
        let entry = result.entry(Engine::Reference).unwrap();
        assert!(entry.is_success());
        assert_eq!(entry.checksum, Some(55.0));
        assert_eq!(entry.round_times_ms.len(), 2);
    }
}
