//! Benchmark case catalog.
//!
//! Each case names one deterministic kernel and carries the advisory
//! parameter metadata front ends use to build their controls. The harness
//! itself never enforces the bounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BenchError;

/// Modulus applied by the `arith_loop` and `matmul` checksums.
pub const MODULUS: u64 = 1_000_000_007;

/// Identifier of a benchmark case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseId {
    /// Iterative Fibonacci with wrapping `u32` arithmetic.
    Fib,
    /// Prime count up to `n` via the Sieve of Eratosthenes.
    PrimeSieve,
    /// Modular sum of `i^2 + i`.
    ArithLoop,
    /// Matrix multiply checksum.
    Matmul,
}

impl CaseId {
    pub const ALL: [CaseId; 4] = [CaseId::Fib, CaseId::PrimeSieve, CaseId::ArithLoop, CaseId::Matmul];

    pub fn as_str(self) -> &'static str {
        match self {
            CaseId::Fib => "fib",
            CaseId::PrimeSieve => "prime_sieve",
            CaseId::ArithLoop => "arith_loop",
            CaseId::Matmul => "matmul",
        }
    }

    /// Descriptor of this case in [`CASES`].
    pub fn case(self) -> &'static Case {
        // CASES is laid out in CaseId order.
        &CASES[self as usize]
    }

    /// Bit used by capability masks (e.g. the C++ bridge).
    pub const fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseId {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CaseId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| BenchError::CaseNotFound(s.to_string()))
    }
}

/// Static descriptor of a benchmark case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Case {
    pub id: CaseId,
    pub label: &'static str,
    pub param_label: &'static str,
    pub default_param: u32,
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub step: Option<u32>,
    pub description: &'static str,
}

impl Case {
    /// Whether `param` lies within the advisory bounds.
    pub fn in_bounds(&self, param: u32) -> bool {
        self.min.is_none_or(|min| param >= min) && self.max.is_none_or(|max| param <= max)
    }

    /// Human-readable `[min, max]` range, or `"unbounded"`.
    pub fn bounds_summary(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("[{min}, {max}]"),
            (Some(min), None) => format!("[{min}, ..)"),
            (None, Some(max)) => format!("(.., {max}]"),
            (None, None) => "unbounded".to_string(),
        }
    }
}

/// The case catalog, in [`CaseId`] order.
pub static CASES: [Case; 4] = [
    Case {
        id: CaseId::Fib,
        label: "Fibonacci (iterative)",
        param_label: "n",
        default_param: 42,
        min: Some(10),
        max: Some(55),
        step: None,
        description: "Compute F(n) with the iterative algorithm, wrapping modulo 2^32.",
    },
    Case {
        id: CaseId::PrimeSieve,
        label: "Prime Sieve (count <= n)",
        param_label: "n",
        default_param: 2_000_000,
        min: Some(100_000),
        max: Some(5_000_000),
        step: Some(50_000),
        description: "Count primes up to n using the Sieve of Eratosthenes.",
    },
    Case {
        id: CaseId::ArithLoop,
        label: "Integer Arithmetic Loop",
        param_label: "iterations",
        default_param: 100_000_000,
        min: Some(1_000_000),
        max: Some(200_000_000),
        step: Some(1_000_000),
        description: "Sum i^2 + i (mod 1,000,000,007).",
    },
    Case {
        id: CaseId::Matmul,
        label: "Matrix Multiply checksum",
        param_label: "size",
        default_param: 120,
        min: Some(32),
        max: Some(256),
        step: Some(8),
        description: "Multiply two size x size matrices; return checksum (mod 1e9+7).",
    },
];

/// Resolve a case id.
///
/// # Errors
///
/// [`BenchError::CaseNotFound`] when `id` is not in the catalog.
pub fn lookup(id: &str) -> Result<&'static Case, BenchError> {
    id.parse::<CaseId>().map(CaseId::case)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_is_in_case_id_order() {
        for (index, id) in CaseId::ALL.into_iter().enumerate() {
            assert_eq!(CASES[index].id, id);
            assert_eq!(id.case().id, id);
        }
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = CASES.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), CASES.len());
    }

    #[test]
    fn defaults_lie_within_bounds() {
        for case in &CASES {
            assert!(case.in_bounds(case.default_param), "{} default out of bounds", case.id);
        }
    }

    #[test]
    fn lookup_resolves_every_id() {
        for id in CaseId::ALL {
            assert_eq!(lookup(id.as_str()).unwrap().id, id);
        }
    }

    #[test]
    fn lookup_rejects_unknown_ids() {
        let err = lookup("quicksort").unwrap_err();
        assert!(matches!(err, BenchError::CaseNotFound(ref id) if id == "quicksort"));
        assert!(lookup("").is_err());
        assert!(lookup("FIB").is_err());
    }

    #[test]
    fn capability_bits_are_distinct() {
        let mask = CaseId::ALL.iter().fold(0u32, |acc, id| {
            assert_eq!(acc & id.bit(), 0);
            acc | id.bit()
        });
        assert_eq!(mask, 0b1111);
    }

    #[test]
    fn bounds_summary_formats() {
        assert_eq!(CaseId::Matmul.case().bounds_summary(), "[32, 256]");
        let open = Case { min: None, max: None, ..CaseId::Fib.case().clone() };
        assert_eq!(open.bounds_summary(), "unbounded");
        assert!(open.in_bounds(u32::MAX));
    }

    #[test]
    fn serde_uses_snake_case_ids() {
        assert_eq!(serde_json::to_string(&CaseId::PrimeSieve).unwrap(), "\"prime_sieve\"");
        let id: CaseId = serde_json::from_str("\"arith_loop\"").unwrap();
        assert_eq!(id, CaseId::ArithLoop);
    }
}
