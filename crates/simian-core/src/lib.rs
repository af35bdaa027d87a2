//! Simian Core Library
//!
//! Perceptual image fingerprints and an adaptive fingerprint trie for
//! near-duplicate image search.
//!
//! # Architecture
//!
//! This crate defines:
//! - The fingerprint codec (`Fingerprint`, DCT, nested-square ordering)
//! - Index entries and trie nodes (`IndexEntry`, `IndexNode`, `NodeId`)
//! - The persistence seam (`IndexStore`) and an in-memory implementation
//! - The index itself (`ImageIndex`: insert / find_nearest)
//! - Error types and configuration
//!
//! Persistent storage lives in `simian-storage`.
//!
//! # Example
//!
//! ```
//! use simian_core::{Fingerprint, Judgment};
//!
//! let a: Fingerprint = "003f".parse().unwrap();
//! let b: Fingerprint = "003e".parse().unwrap();
//! assert_eq!(Judgment::from_difference(a.distance(&b)), Judgment::Variation);
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod fingerprint;
pub mod index;
pub mod node;
pub mod store;
pub mod stubs;

pub use config::{IndexConfig, LoggingConfig, SimianConfig, StorageConfig};
pub use entry::{Attributes, IndexEntry};
pub use error::{CoreError, CoreResult, FingerprintError, StoreError, StoreResult};
pub use fingerprint::{Fingerprint, Judgment, MAX_DIFFERENCE};
pub use index::{ImageIndex, IndexStats, NearMatch};
pub use node::{ChildRef, IndexNode, NodeId, NodeState};
pub use store::IndexStore;
