//! RocksDB configuration.

use simian_core::StorageConfig;

/// Default block cache size: 64MB.
pub const DEFAULT_CACHE_SIZE: usize = 64 * 1024 * 1024;

/// Default maximum number of open files.
pub const DEFAULT_MAX_OPEN_FILES: i32 = 256;

/// RocksDB tuning options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RocksDbConfig {
    /// Maximum open files (default: 256).
    pub max_open_files: i32,
    /// Block cache size in bytes (default: 64MB).
    pub block_cache_size: usize,
    /// Enable Write-Ahead Logging (default: true).
    pub enable_wal: bool,
    /// Create database if missing (default: true).
    pub create_if_missing: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            max_open_files: DEFAULT_MAX_OPEN_FILES,
            block_cache_size: DEFAULT_CACHE_SIZE,
            enable_wal: true,
            create_if_missing: true,
        }
    }
}

impl From<&StorageConfig> for RocksDbConfig {
    fn from(config: &StorageConfig) -> Self {
        Self {
            max_open_files: config.max_open_files,
            block_cache_size: config.block_cache_size,
            enable_wal: config.enable_wal,
            create_if_missing: true,
        }
    }
}
