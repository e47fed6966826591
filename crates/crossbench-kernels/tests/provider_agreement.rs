//! Every constructible provider agrees with the reference engine on the
//! catalog's default and boundary parameters.

use crossbench_common::{CASES, CaseId};
use crossbench_kernels::{
    BoundKernel, CppKernel, KernelProvider, LoaderOptions, OptimizedKernel, ReferenceKernel, resolve,
};

fn alternatives() -> Vec<Box<dyn KernelProvider>> {
    let mut providers: Vec<Box<dyn KernelProvider>> = vec![Box::new(OptimizedKernel)];
    if let Ok(cpp) = CppKernel::new() {
        providers.push(Box::new(cpp));
    }
    providers
}

fn checksum(provider: &dyn KernelProvider, case: CaseId, param: u32) -> f64 {
    BoundKernel::resolve(provider, case)
        .unwrap_or_else(|| panic!("{} does not support {case}", provider.name()))
        .call(param)
        .unwrap()
}

#[test]
fn defaults_agree_across_providers() {
    for case in &CASES {
        let expected = checksum(&ReferenceKernel, case.id, case.default_param);
        assert!(expected.is_finite());
        for provider in alternatives() {
            assert_eq!(
                checksum(provider.as_ref(), case.id, case.default_param),
                expected,
                "{} disagrees on {}({})",
                provider.name(),
                case.id,
                case.default_param
            );
        }
    }
}

#[test]
fn lower_bounds_agree_across_providers() {
    for case in &CASES {
        let Some(min) = case.min else { continue };
        let expected = checksum(&ReferenceKernel, case.id, min);
        for provider in alternatives() {
            assert_eq!(checksum(provider.as_ref(), case.id, min), expected, "{}", case.id);
        }
    }
}

#[test]
fn degenerate_parameters_are_defined() {
    for provider in alternatives() {
        let provider = provider.as_ref();
        assert_eq!(checksum(provider, CaseId::Fib, 0), 0.0);
        assert_eq!(checksum(provider, CaseId::PrimeSieve, 1), 0.0);
        assert_eq!(checksum(provider, CaseId::ArithLoop, 0), 0.0);
        assert_eq!(checksum(provider, CaseId::Matmul, 0), 0.0);
    }
}

#[tokio::test]
async fn loaded_registry_providers_agree() {
    let registry = resolve(&LoaderOptions::default()).await;
    let baseline = registry.provider(crossbench_common::Engine::Reference).unwrap();
    for (engine, slot) in registry.iter() {
        let Some(provider) = slot.provider() else { continue };
        for case in CaseId::ALL {
            let param = case.case().min.unwrap_or(case.case().default_param);
            assert_eq!(
                checksum(provider, case, param),
                checksum(baseline, case, param),
                "{engine} on {case}"
            );
        }
    }
}
