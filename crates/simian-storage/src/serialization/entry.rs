//! Index entry serialization using MessagePack.
//!
//! Attributes are arbitrary `serde_json::Value`s, which need a
//! self-describing format; bincode cannot read them back.

use simian_core::IndexEntry;

use super::error::SerializationError;

/// Encode an entry without its thumbnail.
pub fn serialize_entry(entry: &IndexEntry) -> Result<Vec<u8>, SerializationError> {
    rmp_serde::to_vec_named(entry).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

pub fn deserialize_entry(bytes: &[u8]) -> Result<IndexEntry, SerializationError> {
    rmp_serde::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
