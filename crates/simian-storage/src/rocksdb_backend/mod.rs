//! RocksDB storage backend.
//!
//! # Module Structure
//! - `config`: Configuration options (RocksDbConfig)
//! - `error`: Error types (StorageError)
//! - `core`: Main RocksDbIndexStore struct with open/health/flush
//! - `node_ops`: Node record operations
//! - `entry_ops`: Entry and thumbnail operations
//! - `store_impl`: `IndexStore` implementation
//! - `helpers`: Key formatting utilities

mod config;
mod core;
mod entry_ops;
mod error;
mod helpers;
mod node_ops;
mod store_impl;

#[cfg(test)]
mod tests_core;
#[cfg(test)]
mod tests_store;

pub use config::{RocksDbConfig, DEFAULT_CACHE_SIZE, DEFAULT_MAX_OPEN_FILES};
pub use self::core::RocksDbIndexStore;
pub use error::{StorageError, StorageResult};
pub use helpers::FORMAT_VERSION;
