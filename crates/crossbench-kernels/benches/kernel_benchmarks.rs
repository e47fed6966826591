//! Criterion benchmarks for the built-in kernel providers
//!
//! Complements the harness's own adaptive timing with criterion's
//! statistics, so regressions in a single engine show up in CI history.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use crossbench_common::CaseId;
use crossbench_kernels::{BoundKernel, CppKernel, KernelProvider, OptimizedKernel, ReferenceKernel};
use std::hint::black_box;

/// Providers that can be constructed on this build.
fn providers() -> Vec<Box<dyn KernelProvider>> {
    let mut providers: Vec<Box<dyn KernelProvider>> =
        vec![Box::new(ReferenceKernel), Box::new(OptimizedKernel)];
    if let Ok(cpp) = CppKernel::new() {
        providers.push(Box::new(cpp));
    }
    providers
}

/// Parameters small enough to keep a criterion sample short.
fn bench_params(case: CaseId) -> &'static [u32] {
    match case {
        CaseId::Fib => &[20, 42],
        CaseId::PrimeSieve => &[100_000, 1_000_000],
        CaseId::ArithLoop => &[1_000_000, 10_000_000],
        CaseId::Matmul => &[32, 120],
    }
}

fn bench_case(c: &mut Criterion, case: CaseId) {
    let providers = providers();
    let mut group = c.benchmark_group(case.as_str());

    for provider in &providers {
        let Some(kernel) = BoundKernel::resolve(provider.as_ref(), case) else {
            continue;
        };
        for &param in bench_params(case) {
            group.bench_with_input(BenchmarkId::new(provider.name(), param), &param, |b, &param| {
                b.iter(|| kernel.call(black_box(param)).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_fib(c: &mut Criterion) {
    bench_case(c, CaseId::Fib);
}

fn bench_prime_sieve(c: &mut Criterion) {
    bench_case(c, CaseId::PrimeSieve);
}

fn bench_arith_loop(c: &mut Criterion) {
    bench_case(c, CaseId::ArithLoop);
}

fn bench_matmul(c: &mut Criterion) {
    bench_case(c, CaseId::Matmul);
}

criterion_group!(benches, bench_fib, bench_prime_sieve, bench_arith_loop, bench_matmul);
criterion_main!(benches);
