//! Reference kernels
//!
//! Straightforward implementations that define the expected checksum of
//! every case. These are the baseline engine and the oracle the parity
//! checks compare against, so they favour the obvious algorithm over
//! speed.
//!
//! All arithmetic is integer-exact: `fib` wraps modulo 2^32, `arith_loop`
//! and `matmul` reduce modulo [`MODULUS`].

use crossbench_common::{KernelResult, MODULUS};

use crate::KernelProvider;

/// n-th Fibonacci number (F(0)=0, F(1)=1), wrapping modulo 2^32.
pub fn fib(n: u32) -> u32 {
    if n <= 1 {
        return n;
    }
    let (mut a, mut b) = (0u32, 1u32);
    for _ in 2..=n {
        let next = a.wrapping_add(b);
        a = b;
        b = next;
    }
    b
}

/// Number of primes `<= n`.
pub fn prime_sieve(n: u32) -> u32 {
    if n < 2 {
        return 0;
    }
    let n = n as usize;
    let mut composite = vec![false; n + 1];
    // 2..=n are candidates until crossed out
    let mut count = n - 1;
    let mut p = 2usize;
    while p * p <= n {
        if !composite[p] {
            let mut multiple = p * p;
            while multiple <= n {
                if !composite[multiple] {
                    composite[multiple] = true;
                    count -= 1;
                }
                multiple += p;
            }
        }
        p += 1;
    }
    count as u32
}

/// `sum_{i=1..=iterations} (i*i + i) mod M`, reduced each step.
pub fn arith_loop(iterations: u32) -> u32 {
    let mut acc = 0u64;
    for i in 1..=u64::from(iterations) {
        // i < 2^32 so i*i + i < 2^64
        acc = (acc + (i * i + i) % MODULUS) % MODULUS;
    }
    acc as u32
}

/// Element `(i, j)` of the left operand.
#[inline]
pub fn matmul_a(i: usize, j: usize) -> u32 {
    ((i + j) % 7) as u32
}

/// Element `(i, j)` of the right operand.
#[inline]
pub fn matmul_b(i: usize, j: usize) -> u32 {
    if i == j { 1 } else { ((i + 2 * j) % 5) as u32 }
}

/// Checksum of `C = A * B` for `size x size` matrices: the running sum of
/// `floor(C[i][j])` modulo M.
pub fn matmul(size: u32) -> u32 {
    let n = size as usize;
    let mut a = vec![0f64; n * n];
    let mut b = vec![0f64; n * n];
    for i in 0..n {
        for j in 0..n {
            a[i * n + j] = f64::from(matmul_a(i, j));
            b[i * n + j] = f64::from(matmul_b(i, j));
        }
    }

    let mut c = vec![0f64; n * n];
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0f64;
            for k in 0..n {
                sum += a[i * n + k] * b[k * n + j];
            }
            c[i * n + j] = sum;
        }
    }

    let mut checksum = 0u64;
    for value in c {
        checksum = (checksum + value.floor() as u64 % MODULUS) % MODULUS;
    }
    checksum as u32
}

/// Baseline engine backed by the functions above.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceKernel;

impl KernelProvider for ReferenceKernel {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn fib(&self, n: u32) -> KernelResult {
        Ok(f64::from(fib(n)))
    }

    fn prime_sieve(&self, n: u32) -> KernelResult {
        Ok(f64::from(prime_sieve(n)))
    }

    fn arith_loop(&self, iterations: u32) -> KernelResult {
        Ok(f64::from(arith_loop(iterations)))
    }

    fn matmul(&self, size: u32) -> KernelResult {
        Ok(f64::from(matmul(size)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fib_known_values() {
        assert_eq!(fib(0), 0);
        assert_eq!(fib(1), 1);
        assert_eq!(fib(2), 1);
        assert_eq!(fib(10), 55);
        assert_eq!(fib(42), 267_914_296);
        // F(47) = 2_971_215_073 still fits; F(48) wraps
        assert_eq!(fib(47), 2_971_215_073);
        assert_eq!(fib(48), 4_807_526_976u64 as u32);
    }

    #[test]
    fn prime_sieve_known_values() {
        assert_eq!(prime_sieve(0), 0);
        assert_eq!(prime_sieve(1), 0);
        assert_eq!(prime_sieve(2), 1);
        assert_eq!(prime_sieve(10), 4);
        assert_eq!(prime_sieve(100), 25);
        assert_eq!(prime_sieve(1_000_000), 78_498);
    }

    #[test]
    fn arith_loop_known_values() {
        assert_eq!(arith_loop(0), 0);
        assert_eq!(arith_loop(1), 2);
        assert_eq!(arith_loop(3), 20);
        // n(n+1)(n+2)/3 for n = 1000
        assert_eq!(arith_loop(1000), 334_334_000);
    }

    #[test]
    fn matmul_small_sizes() {
        assert_eq!(matmul(0), 0);
        // A = [[0]], B = [[1]]
        assert_eq!(matmul(1), 0);
        // A = [[0,1],[1,2]], B = [[1,2],[1,1]] -> C = [[1,1],[3,4]]
        assert_eq!(matmul(2), 9);
    }

    #[test]
    fn repeated_calls_agree() {
        for _ in 0..3 {
            assert_eq!(fib(30), 832_040);
            assert_eq!(prime_sieve(10_000), 1_229);
            assert_eq!(matmul(24), matmul(24));
        }
    }

    #[test]
    fn provider_reports_as_f64() {
        let kernel = ReferenceKernel;
        assert_eq!(kernel.name(), "reference");
        assert!(kernel.is_available());
        assert_eq!(kernel.fib(10), Ok(55.0));
        assert_eq!(kernel.prime_sieve(10), Ok(4.0));
        assert_eq!(kernel.arith_loop(3), Ok(20.0));
        assert_eq!(kernel.matmul(2), Ok(9.0));
    }
}
