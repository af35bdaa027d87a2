use std::io::Write;

use super::*;

#[test]
fn test_index_config_defaults() {
    let config = IndexConfig::default();
    assert_eq!(config.max_depth, 8);
    assert_eq!(config.split_threshold, 0.1);
    assert_eq!(config.thumbnail_size, 16);
    assert!(config.validate().is_ok());
}

#[test]
fn test_index_config_rejects_depth_out_of_range() {
    for depth in [0, 9, 64] {
        let config = IndexConfig::default().with_max_depth(depth);
        match config.validate() {
            Err(CoreError::InvalidConfig(msg)) => assert!(msg.contains("max_depth")),
            other => panic!("depth {depth} should be rejected, got {other:?}"),
        }
    }
}

#[test]
fn test_index_config_rejects_bad_threshold() {
    for threshold in [-0.01, f64::NAN, f64::INFINITY] {
        let config = IndexConfig::default().with_split_threshold(threshold);
        assert!(
            config.validate().is_err(),
            "threshold {threshold} should be rejected"
        );
    }

    let zero = IndexConfig::default().with_split_threshold(0.0);
    assert!(zero.validate().is_ok());
}

#[test]
fn test_from_file_with_partial_sections() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[index]
max_depth = 4
split_threshold = 0.25

[storage]
backend = "memory"
"#
    )
    .unwrap();

    let config = SimianConfig::from_file(file.path()).unwrap();
    assert_eq!(config.index.max_depth, 4);
    assert_eq!(config.index.split_threshold, 0.25);
    assert_eq!(config.index.thumbnail_size, 16);
    assert_eq!(config.storage.backend, "memory");
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn test_from_file_rejects_invalid_index() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[index]\nmax_depth = 12").unwrap();

    let result = SimianConfig::from_file(file.path());
    assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
}

#[test]
fn test_validate_rejects_unknown_backend() {
    let mut config = SimianConfig::default();
    config.storage.backend = "postgres".into();
    assert!(matches!(config.validate(), Err(CoreError::ConfigError(_))));
}

#[test]
fn test_from_file_missing_file() {
    let result = SimianConfig::from_file(std::path::Path::new("/nonexistent/simian.toml"));
    match result {
        Err(CoreError::ConfigError(msg)) => assert!(msg.contains("Failed to read")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}
