//! Simian Storage Layer
//!
//! Persistent [`simian_core::IndexStore`] backed by RocksDB.
//!
//! # Architecture
//! - `rocksdb_backend`: `RocksDbIndexStore` and its operations
//! - `column_families`: Column family definitions and tuning
//! - `serialization`: Record encodings (bincode, MessagePack, PNG)
//!
//! # Example
//!
//! ```rust
//! use simian_core::{Attributes, Fingerprint, ImageIndex, IndexConfig, IndexEntry};
//! use simian_storage::RocksDbIndexStore;
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let store = RocksDbIndexStore::open(tmp.path()).unwrap();
//! let index = ImageIndex::new(store, IndexConfig::default()).unwrap();
//!
//! let fingerprint = Fingerprint::from_samples(vec![4; 64]);
//! index
//!     .insert_entry(IndexEntry::new(fingerprint.clone(), Attributes::new()))
//!     .unwrap();
//! assert_eq!(index.find_nearest_to(&fingerprint, 5, 0.0).unwrap().len(), 1);
//! ```

pub mod column_families;
pub mod rocksdb_backend;
pub mod serialization;

pub use column_families::{cf_names, get_column_family_descriptors};
pub use rocksdb_backend::{RocksDbConfig, RocksDbIndexStore, StorageError, StorageResult};
pub use serialization::{NodeRecord, SerializationError};
