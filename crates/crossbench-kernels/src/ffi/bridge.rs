//! FFI bridge implementation for the C++ engine
//!
//! Safe wrappers around the `crossbench_cpp_*` entry points compiled from
//! `csrc/kernels.cpp`. The C++ side reports failures through status codes
//! and a per-thread error message; no exception crosses the boundary.

use crossbench_common::{CaseId, KernelError, KernelResult};

use crate::KernelProvider;

// Keep the public module path stable for callers
pub mod cpp {
    // Real bridge only when the crate feature is on AND build.rs compiled the C++ sources
    #[cfg(all(feature = "cpp", have_cpp))]
    mod imp {
        use std::ffi::{CStr, c_char, c_int};

        unsafe extern "C" {
            fn crossbench_cpp_is_available() -> c_int;
            fn crossbench_cpp_capabilities() -> u32;
            fn crossbench_cpp_fib(n: u32, out: *mut u32) -> c_int;
            fn crossbench_cpp_prime_sieve(n: u32, out: *mut u32) -> c_int;
            fn crossbench_cpp_arith_loop(iterations: u32, out: *mut u32) -> c_int;
            fn crossbench_cpp_matmul(size: u32, out: *mut u32) -> c_int;
            fn crossbench_cpp_last_error() -> *const c_char;
        }

        type Entry = unsafe extern "C" fn(u32, *mut u32) -> c_int;

        pub fn is_available() -> bool {
            unsafe { crossbench_cpp_is_available() != 0 }
        }

        pub fn capabilities() -> u32 {
            unsafe { crossbench_cpp_capabilities() }
        }

        fn call(entry: Entry, param: u32) -> Result<u32, String> {
            let mut out = 0u32;
            let rc = unsafe { entry(param, &mut out) };
            if rc == 0 { Ok(out) } else { Err(format!("status {rc}: {}", last_error())) }
        }

        pub fn fib(n: u32) -> Result<u32, String> {
            call(crossbench_cpp_fib, n)
        }

        pub fn prime_sieve(n: u32) -> Result<u32, String> {
            call(crossbench_cpp_prime_sieve, n)
        }

        pub fn arith_loop(iterations: u32) -> Result<u32, String> {
            call(crossbench_cpp_arith_loop, iterations)
        }

        pub fn matmul(size: u32) -> Result<u32, String> {
            call(crossbench_cpp_matmul, size)
        }

        pub fn last_error() -> String {
            unsafe {
                let ptr = crossbench_cpp_last_error();
                if ptr.is_null() {
                    "unknown error".to_string()
                } else {
                    CStr::from_ptr(ptr).to_string_lossy().into_owned()
                }
            }
        }
    }

    // Fallback stubs when the feature is off OR the C++ build was skipped
    #[cfg(any(not(feature = "cpp"), not(have_cpp)))]
    mod imp {
        const UNAVAILABLE: &str = "cpp bridge unavailable";

        pub fn is_available() -> bool {
            false
        }

        pub fn capabilities() -> u32 {
            0
        }

        pub fn fib(_n: u32) -> Result<u32, String> {
            Err(UNAVAILABLE.to_string())
        }

        pub fn prime_sieve(_n: u32) -> Result<u32, String> {
            Err(UNAVAILABLE.to_string())
        }

        pub fn arith_loop(_iterations: u32) -> Result<u32, String> {
            Err(UNAVAILABLE.to_string())
        }

        pub fn matmul(_size: u32) -> Result<u32, String> {
            Err(UNAVAILABLE.to_string())
        }

        pub fn last_error() -> String {
            UNAVAILABLE.to_string()
        }
    }

    pub use imp::*;
}

/// Engine backed by the C++ kernels.
///
/// Construction fails when the crate was built without the `cpp` feature
/// or the C++ compiler was unavailable at build time; the loader turns
/// that failure into an absent slot.
#[derive(Debug, Clone, Copy)]
pub struct CppKernel {
    capabilities: u32,
}

impl CppKernel {
    pub fn new() -> Result<Self, KernelError> {
        if !cpp::is_available() {
            return Err(KernelError::failed(
                "C++ kernels not built (enable the `cpp` feature and install a C++ compiler)",
            ));
        }
        let capabilities = cpp::capabilities();
        log::debug!("cpp bridge loaded, capability mask {capabilities:#06b}");
        Ok(Self { capabilities })
    }

    /// Raw capability mask reported by the library.
    pub fn capabilities(&self) -> u32 {
        self.capabilities
    }
}

fn to_result(rc: Result<u32, String>) -> KernelResult {
    rc.map(f64::from).map_err(|msg| KernelError::failed(format!("C++ kernel error: {msg}")))
}

impl KernelProvider for CppKernel {
    fn name(&self) -> &'static str {
        "cpp"
    }

    fn is_available(&self) -> bool {
        cpp::is_available()
    }

    fn supports(&self, case: CaseId) -> bool {
        self.capabilities & case.bit() != 0
    }

    fn fib(&self, n: u32) -> KernelResult {
        to_result(cpp::fib(n))
    }

    fn prime_sieve(&self, n: u32) -> KernelResult {
        to_result(cpp::prime_sieve(n))
    }

    fn arith_loop(&self, iterations: u32) -> KernelResult {
        to_result(cpp::arith_loop(iterations))
    }

    fn matmul(&self, size: u32) -> KernelResult {
        to_result(cpp::matmul(size))
    }
}
