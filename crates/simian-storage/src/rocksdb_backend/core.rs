//! Core RocksDbIndexStore struct and database lifecycle.
//!
//! ```text
//! RocksDbIndexStore
//! ├── DB (RocksDB instance)
//! │   ├── CF: nodes       - Node records (bincode)
//! │   ├── CF: entries     - Leaf entries (MessagePack)
//! │   ├── CF: thumbnails  - PNG thumbnails
//! │   └── CF: system      - Format version, index parameters
//! ├── Cache (LRU block cache, shared by all CFs)
//! └── Mutex serialising read-modify-write of node records
//! ```

use std::path::Path;

use parking_lot::Mutex;
use rocksdb::{Cache, ColumnFamily, Options, WriteBatch, WriteOptions, DB};
use tracing::info;

use simian_core::IndexConfig;

use crate::column_families::{cf_names, get_column_family_descriptors};

use super::config::RocksDbConfig;
use super::error::{StorageError, StorageResult};
use super::helpers::{FORMAT_VERSION, FORMAT_VERSION_KEY, INDEX_CONFIG_KEY};

/// RocksDB-backed [`simian_core::IndexStore`].
///
/// # Thread Safety
///
/// RocksDB's `DB` is internally thread-safe. Operations that read a node
/// record, change it and write it back hold `write_lock` so two writers
/// cannot lose each other's child registrations. Each store call commits
/// a single `WriteBatch`.
///
/// # Example
///
/// ```rust
/// use simian_storage::RocksDbIndexStore;
/// use tempfile::TempDir;
///
/// let tmp = TempDir::new().unwrap();
/// let store = RocksDbIndexStore::open(tmp.path()).unwrap();
/// store.health_check().unwrap();
/// store.flush_all().unwrap();
/// ```
pub struct RocksDbIndexStore {
    pub(crate) db: DB,

    /// Kept alive for the database lifetime.
    #[allow(dead_code)]
    cache: Cache,

    pub(crate) write_lock: Mutex<()>,

    enable_wal: bool,

    path: String,
}

impl RocksDbIndexStore {
    /// Opens the database at `path` with default configuration, creating it
    /// and all column families if needed.
    ///
    /// # Errors
    ///
    /// * `StorageError::OpenFailed` - Path is invalid, permissions denied,
    ///   database is locked, or disk is full
    /// * `StorageError::IndexCorrupted` - The database was written by an
    ///   incompatible format version
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::open_with_config(path, RocksDbConfig::default())
    }

    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: RocksDbConfig,
    ) -> StorageResult<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let cache = Cache::new_lru_cache(config.block_cache_size);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(config.create_if_missing);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_open_files(config.max_open_files);

        let cf_descriptors = get_column_family_descriptors(&cache);

        let db = DB::open_cf_descriptors(&db_opts, &path_str, cf_descriptors).map_err(|e| {
            StorageError::OpenFailed {
                path: path_str.clone(),
                message: e.to_string(),
            }
        })?;

        let store = Self {
            db,
            cache,
            write_lock: Mutex::new(()),
            enable_wal: config.enable_wal,
            path: path_str,
        };
        store.check_format_version()?;

        info!(path = %store.path, wal = config.enable_wal, "Opened RocksDbIndexStore");
        Ok(store)
    }

    /// Gets a reference to a column family by name.
    pub fn get_cf(&self, name: &str) -> StorageResult<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound {
                name: name.to_string(),
            })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Verifies that every column family is accessible.
    pub fn health_check(&self) -> StorageResult<()> {
        for cf_name in cf_names::ALL {
            self.get_cf(cf_name)?;
        }
        Ok(())
    }

    /// Flushes all column families to disk.
    pub fn flush_all(&self) -> StorageResult<()> {
        for cf_name in cf_names::ALL {
            let cf = self.get_cf(cf_name)?;
            self.db
                .flush_cf(cf)
                .map_err(|e| StorageError::FlushFailed(e.to_string()))?;
        }
        Ok(())
    }

    /// Commit `batch` atomically.
    pub(crate) fn write(&self, batch: WriteBatch) -> StorageResult<()> {
        let mut opts = WriteOptions::default();
        opts.disable_wal(!self.enable_wal);
        self.db
            .write_opt(batch, &opts)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))
    }

    /// Index parameters this database was built with, if recorded.
    pub fn load_index_config(&self) -> StorageResult<Option<IndexConfig>> {
        let cf = self.get_cf(cf_names::SYSTEM)?;
        let Some(bytes) = self
            .db
            .get_cf(cf, INDEX_CONFIG_KEY)
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?
        else {
            return Ok(None);
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StorageError::IndexCorrupted {
                index_name: cf_names::SYSTEM.to_string(),
                details: format!("index_config: {}", e),
            })
    }

    /// Record the index parameters next to the data they shaped.
    pub fn save_index_config(&self, config: &IndexConfig) -> StorageResult<()> {
        let cf = self.get_cf(cf_names::SYSTEM)?;
        let bytes =
            serde_json::to_vec(config).map_err(|e| StorageError::Serialization(e.to_string()))?;

        let mut batch = WriteBatch::default();
        batch.put_cf(cf, INDEX_CONFIG_KEY, bytes);
        self.write(batch)
    }

    fn check_format_version(&self) -> StorageResult<()> {
        let cf = self.get_cf(cf_names::SYSTEM)?;
        let stored = self
            .db
            .get_cf(cf, FORMAT_VERSION_KEY)
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        match stored {
            None => {
                let mut batch = WriteBatch::default();
                batch.put_cf(cf, FORMAT_VERSION_KEY, FORMAT_VERSION.to_be_bytes());
                self.write(batch)
            }
            Some(bytes) => {
                let version = <[u8; 4]>::try_from(bytes.as_slice())
                    .map(u32::from_be_bytes)
                    .map_err(|_| StorageError::IndexCorrupted {
                        index_name: cf_names::SYSTEM.to_string(),
                        details: format!("format_version has {} bytes", bytes.len()),
                    })?;
                if version != FORMAT_VERSION {
                    return Err(StorageError::IndexCorrupted {
                        index_name: cf_names::SYSTEM.to_string(),
                        details: format!(
                            "format version {} is not supported (expected {})",
                            version, FORMAT_VERSION
                        ),
                    });
                }
                Ok(())
            }
        }
    }
}
