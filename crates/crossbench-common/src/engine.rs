//! Engine names: the fixed set of kernel implementations a run compares.
//!
//! The order of [`Engine::ALL`] is the order engines are measured and
//! reported in: the baseline first, then the alternatives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// A kernel implementation known to the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Pure-Rust reference kernels; the baseline every other engine is
    /// compared against. Always available.
    Reference,
    /// Pure-Rust algorithmic variants.
    Optimized,
    /// C++ kernels behind the FFI bridge.
    Cpp,
}

impl Engine {
    pub const ALL: [Engine; 3] = [Engine::Reference, Engine::Optimized, Engine::Cpp];

    pub fn as_str(self) -> &'static str {
        match self {
            Engine::Reference => "reference",
            Engine::Optimized => "optimized",
            Engine::Cpp => "cpp",
        }
    }

    /// Whether this is the baseline engine.
    pub fn is_baseline(self) -> bool {
        matches!(self, Engine::Reference)
    }

    /// Whether the loader may resolve this engine to an absent slot.
    pub fn is_optional(self) -> bool {
        !self.is_baseline()
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reference" | "ref" | "baseline" => Ok(Engine::Reference),
            "optimized" | "opt" => Ok(Engine::Optimized),
            "cpp" | "c++" | "cpp-ffi" => Ok(Engine::Cpp),
            other => Err(ConfigError::UnknownEngine(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_comes_first() {
        assert_eq!(Engine::ALL[0], Engine::Reference);
        assert!(Engine::ALL[0].is_baseline());
        assert!(Engine::ALL[1..].iter().all(|e| e.is_optional()));
    }

    #[test]
    fn display_roundtrip() {
        for engine in Engine::ALL {
            let parsed: Engine = engine.to_string().parse().unwrap();
            assert_eq!(parsed, engine);
        }
    }

    #[test]
    fn aliases_parse() {
        assert_eq!("C++".parse::<Engine>().unwrap(), Engine::Cpp);
        assert_eq!("baseline".parse::<Engine>().unwrap(), Engine::Reference);
        assert_eq!("OPT".parse::<Engine>().unwrap(), Engine::Optimized);
    }

    #[test]
    fn unknown_engine_is_error() {
        let err = "wasm".parse::<Engine>().unwrap_err();
        assert!(err.to_string().contains("unknown engine"));
    }
}
