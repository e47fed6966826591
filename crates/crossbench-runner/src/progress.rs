//! Progress events emitted between timed segments of a run.

use std::fmt;

use crossbench_common::{CaseId, Engine};
use crossbench_kernels::KernelRegistry;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Warmup,
    Round,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Warmup => write!(f, "warmup"),
            Phase::Round => write!(f, "round"),
        }
    }
}

/// One completed warmup call or measured round. `current` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub engine: Engine,
    pub phase: Phase,
    pub current: usize,
    pub total: usize,
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}/{}", self.engine, self.phase, self.current, self.total)
    }
}

/// Total number of events a run will emit: every engine that is present
/// and supports `case` reports `warmup + rounds` times.
pub fn expected_progress_steps(
    registry: &KernelRegistry,
    case: CaseId,
    warmup: usize,
    rounds: usize,
) -> usize {
    let measured = registry
        .iter()
        .filter_map(|(_, slot)| slot.provider())
        .filter(|provider| provider.supports(case))
        .count();
    measured * (warmup + rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbench_kernels::OptimizedKernel;

    #[test]
    fn steps_count_only_measured_engines() {
        let registry = KernelRegistry::new();
        assert_eq!(expected_progress_steps(&registry, CaseId::Fib, 2, 3), 5);

        let registry = registry.with_provider(Engine::Optimized, Box::new(OptimizedKernel));
        assert_eq!(expected_progress_steps(&registry, CaseId::Fib, 2, 3), 10);
        assert_eq!(expected_progress_steps(&registry, CaseId::Fib, 0, 0), 0);
    }

    #[test]
    fn event_display() {
        let event = ProgressEvent { engine: Engine::Cpp, phase: Phase::Round, current: 2, total: 5 };
        assert_eq!(event.to_string(), "cpp round 2/5");
    }
}
