//! Lifecycle tests for the RocksDB backend.

use rocksdb::WriteBatch;
use tempfile::TempDir;

use simian_core::IndexConfig;

use super::config::RocksDbConfig;
use super::core::RocksDbIndexStore;
use super::error::StorageError;
use super::helpers::{FORMAT_VERSION, FORMAT_VERSION_KEY};
use crate::column_families::cf_names;

// =========================================================================
// Helper Functions
// =========================================================================

pub(crate) fn create_temp_db() -> (TempDir, RocksDbIndexStore) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let db = RocksDbIndexStore::open(tmp.path()).expect("Failed to open database");
    (tmp, db)
}

// =========================================================================
// open / health
// =========================================================================

#[test]
fn test_open_creates_all_column_families() {
    println!("=== TEST: open creates column families ===");
    let (_tmp, db) = create_temp_db();

    for name in cf_names::ALL {
        assert!(db.get_cf(name).is_ok(), "missing column family {name}");
    }
    db.health_check().expect("health check failed");
    println!("RESULT: {} column families present", cf_names::ALL.len());
}

#[test]
fn test_open_with_custom_config() {
    let tmp = TempDir::new().unwrap();
    let config = RocksDbConfig {
        block_cache_size: 8 * 1024 * 1024,
        max_open_files: 64,
        enable_wal: false,
        create_if_missing: true,
    };
    let db = RocksDbIndexStore::open_with_config(tmp.path(), config).unwrap();
    assert_eq!(db.path(), tmp.path().to_string_lossy());
    db.flush_all().unwrap();
}

#[test]
fn test_open_missing_without_create_fails() {
    let tmp = TempDir::new().unwrap();
    let config = RocksDbConfig {
        create_if_missing: false,
        ..RocksDbConfig::default()
    };
    let result = RocksDbIndexStore::open_with_config(tmp.path().join("absent"), config);
    assert!(matches!(result, Err(StorageError::OpenFailed { .. })));
}

#[test]
fn test_unknown_column_family() {
    let (_tmp, db) = create_temp_db();
    let result = db.get_cf("no_such_cf");
    assert!(matches!(
        result,
        Err(StorageError::ColumnFamilyNotFound { name }) if name == "no_such_cf"
    ));
}

// =========================================================================
// system column family
// =========================================================================

#[test]
fn test_format_version_written_on_open() {
    let (_tmp, db) = create_temp_db();
    let cf = db.get_cf(cf_names::SYSTEM).unwrap();
    let stored = db.db.get_cf(cf, FORMAT_VERSION_KEY).unwrap().unwrap();
    assert_eq!(stored, FORMAT_VERSION.to_be_bytes().to_vec());
}

#[test]
fn test_incompatible_format_version_is_refused() {
    let tmp = TempDir::new().unwrap();
    {
        let db = RocksDbIndexStore::open(tmp.path()).unwrap();
        let cf = db.get_cf(cf_names::SYSTEM).unwrap();
        let mut batch = WriteBatch::default();
        batch.put_cf(cf, FORMAT_VERSION_KEY, 99u32.to_be_bytes());
        db.write(batch).unwrap();
    }

    let result = RocksDbIndexStore::open(tmp.path());
    match result {
        Err(StorageError::IndexCorrupted { details, .. }) => assert!(details.contains("99")),
        Err(other) => panic!("expected IndexCorrupted, got {other:?}"),
        Ok(_) => panic!("expected IndexCorrupted, got a store"),
    }
}

#[test]
fn test_index_config_persists_across_reopen() {
    let tmp = TempDir::new().unwrap();
    let config = IndexConfig::default()
        .with_max_depth(5)
        .with_split_threshold(0.15);

    {
        let db = RocksDbIndexStore::open(tmp.path()).unwrap();
        assert_eq!(db.load_index_config().unwrap(), None);
        db.save_index_config(&config).unwrap();
    }

    let db = RocksDbIndexStore::open(tmp.path()).unwrap();
    assert_eq!(db.load_index_config().unwrap(), Some(config));
}
