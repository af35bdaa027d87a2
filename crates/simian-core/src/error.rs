//! Error types for simian-core.
//!
//! This module defines the central error type [`CoreError`] along with the
//! narrower [`FingerprintError`] and [`StoreError`] that the codec and the
//! store layer report.
//!
//! # Examples
//!
//! ```rust
//! use simian_core::{CoreError, FingerprintError};
//!
//! let error: CoreError = FingerprintError::InvalidByteLength { len: 3 }.into();
//! assert!(error.to_string().contains("3"));
//! ```

use thiserror::Error;

use crate::node::NodeId;

/// Top-level error type for simian-core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Index or application configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Fingerprint could not be computed or decoded.
    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),

    /// The backing store failed. The store's own error is carried verbatim.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Image decoding or encoding failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors raised while computing, encoding or decoding fingerprints.
///
/// Comparing fingerprints of different lengths is not an error; see
/// [`crate::MAX_DIFFERENCE`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    /// Byte form must hold whole big-endian 16-bit samples.
    #[error("Invalid fingerprint byte length {len}: expected an even number of bytes")]
    InvalidByteLength {
        /// Length of the rejected buffer
        len: usize,
    },

    /// Hex form must hold four hex digits per sample.
    #[error("Invalid fingerprint hex text: {reason}")]
    InvalidHex {
        /// What was wrong with the text
        reason: String,
    },

    /// Images without pixels have no fingerprint.
    #[error("Cannot fingerprint an empty image ({width}x{height})")]
    EmptyImage {
        /// Image width in pixels
        width: u32,
        /// Image height in pixels
        height: u32,
    },
}

/// Errors reported by [`crate::IndexStore`] implementations.
///
/// The trie engine never retries; the first store error aborts the running
/// operation and is handed to the caller unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failure inside the persistence backend (I/O, serialization, ...).
    #[error("Store backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A node referenced by its parent is missing from the store.
    #[error("Node not found: {id}")]
    NodeNotFound {
        /// Address of the missing node
        id: NodeId,
    },

    /// Two different prefixes were mapped to the same child address.
    #[error("Child address collision under node {parent}: stored prefix {stored} != requested prefix {requested}")]
    KeyCollision {
        /// Parent whose child table collided
        parent: NodeId,
        /// Prefix recorded on the stored child (hex)
        stored: String,
        /// Prefix that was requested (hex)
        requested: String,
    },

    /// A node mutation would have produced a node that is both leaf and internal.
    #[error("Invalid node state on {id}: {reason}")]
    InvalidNodeState {
        /// Offending node
        id: NodeId,
        /// Transition that was refused
        reason: String,
    },

    /// Stored data does not describe a valid tree.
    #[error("Corrupted index data: {0}")]
    Corrupted(String),
}

impl StoreError {
    /// Wrap any backend error, keeping it as the error source.
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(error))
    }

    /// Create an invalid-state error.
    pub fn invalid_state(id: NodeId, reason: impl Into<String>) -> Self {
        Self::InvalidNodeState {
            id,
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::ConfigError(err.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::ConfigError(err.to_string())
    }
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
