//! Storage error types for the RocksDB backend.

use thiserror::Error;

use simian_core::StoreError;

use crate::serialization::SerializationError;

/// Storage operation errors.
///
/// Reported to the index as [`StoreError::Backend`], which keeps this error
/// as its source.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database failed to open.
    #[error("Failed to open database at '{path}': {message}")]
    OpenFailed { path: String, message: String },

    /// Column family not found (should never happen if DB opened correctly).
    #[error("Column family '{name}' not found")]
    ColumnFamilyNotFound { name: String },

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Flush failed: {0}")]
    FlushFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored data is inconsistent.
    #[error("Index corruption detected in {index_name}: {details}")]
    IndexCorrupted {
        /// Column family or record kind that is damaged
        index_name: String,
        details: String,
    },
}

impl From<SerializationError> for StorageError {
    fn from(e: SerializationError) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

impl From<StorageError> for StoreError {
    fn from(e: StorageError) -> Self {
        StoreError::backend(e)
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_open_failed() {
        let error = StorageError::OpenFailed {
            path: "/tmp/test".to_string(),
            message: "permission denied".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("/tmp/test"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_error_column_family_not_found() {
        let error = StorageError::ColumnFamilyNotFound {
            name: "unknown_cf".to_string(),
        };
        assert!(error.to_string().contains("unknown_cf"));
    }

    #[test]
    fn test_from_serialization_error() {
        let ser_error = SerializationError::DeserializeFailed("truncated".to_string());
        let storage_error: StorageError = ser_error.into();
        assert!(matches!(storage_error, StorageError::Serialization(_)));
        assert!(storage_error.to_string().contains("truncated"));
    }

    #[test]
    fn test_into_store_error_keeps_source() {
        let store_error: StoreError = StorageError::WriteFailed("disk full".to_string()).into();
        assert!(matches!(store_error, StoreError::Backend(_)));

        let source = store_error.source().expect("source must be kept");
        let storage = source
            .downcast_ref::<StorageError>()
            .expect("source must be the storage error");
        assert!(matches!(storage, StorageError::WriteFailed(_)));
    }
}
