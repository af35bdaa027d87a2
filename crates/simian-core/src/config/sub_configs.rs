//! Sub-configuration structures that make up [`super::SimianConfig`].

use serde::{Deserialize, Serialize};

use super::constants::index::{
    DEFAULT_MAX_DEPTH, DEFAULT_SPLIT_THRESHOLD, DEFAULT_THUMBNAIL_SIZE, MAX_SUPPORTED_DEPTH,
};
use crate::error::{CoreError, CoreResult};

/// Trie parameters.
///
/// `split_threshold` is the largest difference two entries may have while
/// sharing a leaf. It also acts as the lower bound of every query's
/// `max_difference`, since a leaf can hold anything within that range.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Deepest trie level, `1..=8`. Depth 1 keeps everything in the root.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_split_threshold")]
    pub split_threshold: f64,

    /// Short side of generated thumbnails in pixels; 0 disables thumbnails.
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_split_threshold() -> f64 {
    DEFAULT_SPLIT_THRESHOLD
}

fn default_thumbnail_size() -> u32 {
    DEFAULT_THUMBNAIL_SIZE
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
        }
    }
}

impl IndexConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_split_threshold(mut self, split_threshold: f64) -> Self {
        self.split_threshold = split_threshold;
        self
    }

    pub fn with_thumbnail_size(mut self, thumbnail_size: u32) -> Self {
        self.thumbnail_size = thumbnail_size;
        self
    }

    /// Validate parameters.
    ///
    /// # Errors
    ///
    /// `CoreError::InvalidConfig` if `max_depth` is outside `1..=8` or
    /// `split_threshold` is negative, NaN or infinite.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_depth == 0 || self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(CoreError::InvalidConfig(format!(
                "index.max_depth must be in 1..={}, got {}",
                MAX_SUPPORTED_DEPTH, self.max_depth
            )));
        }

        if !self.split_threshold.is_finite() || self.split_threshold < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "index.split_threshold must be finite and >= 0, got {}",
                self.split_threshold
            )));
        }

        Ok(())
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// "rocksdb" or "memory"
    #[serde(default = "default_backend")]
    pub backend: String,

    #[serde(default = "default_path")]
    pub path: String,

    /// Block cache size in bytes.
    #[serde(default = "default_block_cache_size")]
    pub block_cache_size: usize,

    #[serde(default = "default_max_open_files")]
    pub max_open_files: i32,

    #[serde(default = "default_enable_wal")]
    pub enable_wal: bool,
}

fn default_backend() -> String {
    "rocksdb".to_string()
}

fn default_path() -> String {
    "./data/simian".to_string()
}

fn default_block_cache_size() -> usize {
    64 * 1024 * 1024
}

fn default_max_open_files() -> i32 {
    256
}

fn default_enable_wal() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_path(),
            block_cache_size: default_block_cache_size(),
            max_open_files: default_max_open_files(),
            enable_wal: default_enable_wal(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// "pretty" or "compact"
    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default)]
    pub include_location: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "compact".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            include_location: false,
        }
    }
}
