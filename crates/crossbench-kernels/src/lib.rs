//! Benchmark kernels for crossbench
//!
//! Every engine implements [`KernelProvider`]. The [`registry`] module
//! holds one slot per [`Engine`](crossbench_common::Engine) and the
//! [`loader`] resolves optional engines concurrently at startup.

use crossbench_common::{CaseId, KernelResult};

pub mod ffi;
pub mod loader;
pub mod optimized;
pub mod reference;
pub mod registry;

pub use ffi::CppKernel;
pub use loader::{LoaderOptions, probe_engine, resolve};
pub use optimized::OptimizedKernel;
pub use reference::ReferenceKernel;
pub use registry::{EngineSlot, KernelRegistry};

/// Kernel provider trait
///
/// Every kernel is a pure function of its single integer parameter and
/// returns the checksum as an `f64`. Engines that do not ship a given
/// kernel override [`supports`](KernelProvider::supports).
pub trait KernelProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the provider can run at all on this host.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether this provider exposes the kernel for `case`.
    fn supports(&self, case: CaseId) -> bool {
        let _ = case;
        true
    }

    fn fib(&self, n: u32) -> KernelResult;
    fn prime_sieve(&self, n: u32) -> KernelResult;
    fn arith_loop(&self, iterations: u32) -> KernelResult;
    fn matmul(&self, size: u32) -> KernelResult;
}

/// Uniform call signature shared by all four kernels.
pub type KernelFn = fn(&dyn KernelProvider, u32) -> KernelResult;

fn call_fib(provider: &dyn KernelProvider, param: u32) -> KernelResult {
    provider.fib(param)
}

fn call_prime_sieve(provider: &dyn KernelProvider, param: u32) -> KernelResult {
    provider.prime_sieve(param)
}

fn call_arith_loop(provider: &dyn KernelProvider, param: u32) -> KernelResult {
    provider.arith_loop(param)
}

fn call_matmul(provider: &dyn KernelProvider, param: u32) -> KernelResult {
    provider.matmul(param)
}

/// Trait method backing `case`.
pub fn dispatch(case: CaseId) -> KernelFn {
    match case {
        CaseId::Fib => call_fib,
        CaseId::PrimeSieve => call_prime_sieve,
        CaseId::ArithLoop => call_arith_loop,
        CaseId::Matmul => call_matmul,
    }
}

/// A provider paired with the kernel for one case.
///
/// Resolved once per (engine, case) pair so the timing loop never
/// re-checks support or re-matches on the case.
#[derive(Clone, Copy)]
pub struct BoundKernel<'a> {
    provider: &'a dyn KernelProvider,
    call: KernelFn,
}

impl<'a> BoundKernel<'a> {
    /// Returns `None` when the provider does not expose the kernel.
    pub fn resolve(provider: &'a dyn KernelProvider, case: CaseId) -> Option<Self> {
        if !provider.supports(case) {
            return None;
        }
        Some(Self { provider, call: dispatch(case) })
    }

    #[inline]
    pub fn call(&self, param: u32) -> KernelResult {
        (self.call)(self.provider, param)
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}

impl std::fmt::Debug for BoundKernel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundKernel").field("provider", &self.provider.name()).finish()
    }
}
