//! FFI bridge to the C++ kernels in `csrc/`.

mod bridge;

pub use bridge::{CppKernel, cpp};
