//! Serialization error types.

use thiserror::Error;

/// Errors raised while encoding or decoding stored records.
///
/// `bincode::Error` and the MessagePack errors are not `Clone`, so messages
/// are kept as strings. They become
/// [`StorageError::Serialization`](crate::StorageError::Serialization) when
/// propagated from storage operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SerializationError {
    /// Encoding a record failed.
    #[error("Serialization failed: {0}")]
    SerializeFailed(String),

    /// Decoding a record failed: corrupted data, truncated write or a
    /// record from an incompatible format version.
    #[error("Deserialization failed: {0}")]
    DeserializeFailed(String),

    /// A key read back from the database has the wrong width.
    #[error("Invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize {
        /// Expected byte count
        expected: usize,
        /// Actual byte count received
        actual: usize,
    },
}
