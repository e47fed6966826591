//! Concurrent engine resolution.
//!
//! Optional engines are probed on the blocking pool in parallel. A probe
//! that errors, panics, or reports unavailable leaves its slot absent; it
//! never fails the load as a whole.

use crossbench_common::{Engine, HarnessConfig, KernelError};

use crate::registry::{EngineSlot, KernelRegistry};
use crate::{CppKernel, KernelProvider, OptimizedKernel};

/// What the loader should and should not bring up.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    pub disabled: Vec<Engine>,
}

impl From<&HarnessConfig> for LoaderOptions {
    fn from(config: &HarnessConfig) -> Self {
        Self { disabled: config.disabled_engines.clone() }
    }
}

impl LoaderOptions {
    pub fn is_disabled(&self, engine: Engine) -> bool {
        self.disabled.contains(&engine)
    }
}

/// Outcome of constructing a provider.
pub type ProviderResult = Result<Box<dyn KernelProvider>, KernelError>;

/// Resolve every engine into a registry.
///
/// Must be called from within a Tokio runtime.
pub async fn resolve(options: &LoaderOptions) -> KernelRegistry {
    let (optimized, cpp) = tokio::join!(
        probe_engine(Engine::Optimized, options, || {
            Ok(Box::new(OptimizedKernel) as Box<dyn KernelProvider>)
        }),
        probe_engine(Engine::Cpp, options, || {
            CppKernel::new().map(|kernel| Box::new(kernel) as Box<dyn KernelProvider>)
        }),
    );

    let mut registry = KernelRegistry::new();
    registry.set(Engine::Optimized, optimized).set(Engine::Cpp, cpp);
    log::info!("engines resolved: {}", registry.summary());
    registry
}

/// Run `init` on the blocking pool and turn its outcome into a slot.
pub async fn probe_engine<F>(engine: Engine, options: &LoaderOptions, init: F) -> EngineSlot
where
    F: FnOnce() -> ProviderResult + Send + 'static,
{
    if options.is_disabled(engine) {
        log::info!("{engine} engine disabled by configuration");
        return EngineSlot::absent("disabled by configuration");
    }

    match tokio::task::spawn_blocking(init).await {
        Ok(Ok(provider)) if provider.is_available() => {
            log::debug!("{engine} engine loaded ({})", provider.name());
            EngineSlot::Available(provider)
        }
        Ok(Ok(provider)) => {
            log::warn!("{engine} engine loaded but reports unavailable");
            EngineSlot::absent(format!("{} reports unavailable", provider.name()))
        }
        Ok(Err(err)) => {
            log::warn!("{engine} engine not available: {err}");
            EngineSlot::absent(err.to_string())
        }
        Err(join_err) => {
            log::warn!("{engine} engine probe aborted: {join_err}");
            let reason = if join_err.is_panic() {
                KernelError::from_panic(join_err.into_panic()).to_string()
            } else {
                join_err.to_string()
            };
            EngineSlot::absent(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReferenceKernel;

    struct Offline;

    impl KernelProvider for Offline {
        fn name(&self) -> &'static str {
            "offline"
        }
        fn is_available(&self) -> bool {
            false
        }
        fn fib(&self, _n: u32) -> crossbench_common::KernelResult {
            Err(KernelError::Unavailable)
        }
        fn prime_sieve(&self, _n: u32) -> crossbench_common::KernelResult {
            Err(KernelError::Unavailable)
        }
        fn arith_loop(&self, _iterations: u32) -> crossbench_common::KernelResult {
            Err(KernelError::Unavailable)
        }
        fn matmul(&self, _size: u32) -> crossbench_common::KernelResult {
            Err(KernelError::Unavailable)
        }
    }

    #[tokio::test]
    async fn resolve_brings_up_optimized_engine() {
        let registry = resolve(&LoaderOptions::default()).await;
        assert!(registry.slot(Engine::Reference).is_available());
        assert!(registry.slot(Engine::Optimized).is_available());
        // cpp depends on the build; either way it has a slot
        let _ = registry.slot(Engine::Cpp);
    }

    #[tokio::test]
    async fn disabled_engines_stay_absent() {
        let options = LoaderOptions { disabled: vec![Engine::Optimized, Engine::Cpp] };
        let registry = resolve(&options).await;
        assert_eq!(registry.available(), vec![Engine::Reference]);
        assert_eq!(registry.slot(Engine::Optimized).reason(), Some("disabled by configuration"));
    }

    #[test]
    fn options_follow_harness_config() {
        let config = HarnessConfig { disabled_engines: vec![Engine::Cpp], ..HarnessConfig::default() };
        let options = LoaderOptions::from(&config);
        assert!(options.is_disabled(Engine::Cpp));
        assert!(!options.is_disabled(Engine::Optimized));
    }

    #[tokio::test]
    async fn failing_probe_becomes_absent() {
        let slot = probe_engine(Engine::Cpp, &LoaderOptions::default(), || {
            Err(KernelError::failed("library missing"))
        })
        .await;
        assert_eq!(slot.reason(), Some("library missing"));
    }

    #[tokio::test]
    async fn panicking_probe_becomes_absent() {
        let slot = probe_engine(Engine::Optimized, &LoaderOptions::default(), || -> ProviderResult {
            panic!("probe exploded")
        })
        .await;
        assert_eq!(slot.reason(), Some("kernel panicked: probe exploded"));
    }

    #[tokio::test]
    async fn unavailable_provider_becomes_absent() {
        let slot = probe_engine(Engine::Cpp, &LoaderOptions::default(), || {
            Ok(Box::new(Offline) as Box<dyn KernelProvider>)
        })
        .await;
        assert_eq!(slot.reason(), Some("offline reports unavailable"));
    }

    #[tokio::test]
    async fn successful_probe_is_available() {
        let slot = probe_engine(Engine::Optimized, &LoaderOptions::default(), || {
            Ok(Box::new(ReferenceKernel) as Box<dyn KernelProvider>)
        })
        .await;
        assert!(slot.is_available());
    }
}
