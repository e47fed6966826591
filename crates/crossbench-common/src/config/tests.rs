//! Configuration tests

use super::*;
use serial_test::serial;

fn clear_env() -> [(&'static str, Option<&'static str>); 5] {
    ENV_VARS.map(|key| (key, None))
}

#[test]
fn test_default_config() {
    let config = HarnessConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.warmup, 1);
    assert_eq!(config.rounds, 5);
    assert_eq!(config.min_batch_time(), Duration::from_millis(10));
    assert_eq!(config.max_batch_reps, 10_000_000);
    assert!(config.disabled_engines.is_empty());
}

#[test]
fn test_config_validation() {
    let mut config = HarnessConfig::default();
    config.rounds = 0;
    assert!(config.validate().is_err());

    config = HarnessConfig::default();
    config.min_batch_time_ms = 0.0;
    assert!(config.validate().is_err());

    config = HarnessConfig::default();
    config.min_batch_time_ms = f64::NAN;
    assert!(config.validate().is_err());

    config = HarnessConfig::default();
    config.max_batch_reps = 0;
    assert!(config.validate().is_err());

    config = HarnessConfig::default();
    config.disabled_engines = vec![Engine::Reference];
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("baseline"));

    // zero warmup is a valid request
    config = HarnessConfig::default();
    config.warmup = 0;
    config.disabled_engines = vec![Engine::Cpp];
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_table_keeps_defaults() {
    let config: HarnessConfig =
        serde_json::from_str(r#"{"warmup": 3, "min_batch_time_ms": 2.5, "disabled_engines": ["cpp"]}"#)
            .unwrap();
    assert_eq!(config.warmup, 3);
    assert_eq!(config.min_batch_time_ms, 2.5);
    // unspecified fields keep their defaults
    assert_eq!(config.rounds, 5);
    assert_eq!(config.max_batch_reps, 10_000_000);
    assert_eq!(config.disabled_engines, vec![Engine::Cpp]);
}

#[test]
fn test_min_batch_time_falls_back_when_out_of_range() {
    for bad in [-1.0, 0.0, f64::NAN, f64::INFINITY, f64::MAX] {
        let config = HarnessConfig { min_batch_time_ms: bad, ..HarnessConfig::default() };
        assert_eq!(config.min_batch_time(), DEFAULT_MIN_BATCH_TIME, "min_batch_time_ms = {bad}");
    }
    let config = HarnessConfig { min_batch_time_ms: 0.5, ..HarnessConfig::default() };
    assert_eq!(config.min_batch_time(), Duration::from_micros(500));
}

#[test]
#[serial]
fn test_env_overrides() {
    temp_env::with_vars(
        [
            (ENV_WARMUP, Some("0")),
            (ENV_ROUNDS, Some("12")),
            (ENV_MIN_BATCH_MS, Some("1.5")),
            (ENV_MAX_BATCH_REPS, Some("5000")),
            (ENV_DISABLE_ENGINES, Some("cpp, optimized")),
        ],
        || {
            let mut config = HarnessConfig::default();
            config.apply_env().unwrap();
            assert_eq!(config.warmup, 0);
            assert_eq!(config.rounds, 12);
            assert_eq!(config.min_batch_time_ms, 1.5);
            assert_eq!(config.max_batch_reps, 5000);
            assert_eq!(config.disabled_engines, vec![Engine::Cpp, Engine::Optimized]);
        },
    );
}

#[test]
#[serial]
fn test_env_absent_keeps_existing_values() {
    temp_env::with_vars(clear_env(), || {
        let mut config = HarnessConfig { rounds: 3, ..HarnessConfig::default() };
        config.apply_env().unwrap();
        assert_eq!(config.rounds, 3);
    });
}

#[test]
#[serial]
fn test_invalid_env_value_is_reported() {
    temp_env::with_vars([(ENV_ROUNDS, Some("five"))], || {
        let err = HarnessConfig::default().apply_env().unwrap_err();
        match err {
            ConfigError::InvalidEnvVar { key, value } => {
                assert_eq!(key, ENV_ROUNDS);
                assert_eq!(value, "five");
            }
            other => panic!("unexpected error: {other}"),
        }
    });

    temp_env::with_vars([(ENV_DISABLE_ENGINES, Some("cpp,wasm"))], || {
        let err = HarnessConfig::default().apply_env().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEngine(ref e) if e == "wasm"));
    });
}
