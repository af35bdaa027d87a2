//! Entry and thumbnail operations.

use image::RgbaImage;
use rocksdb::WriteBatch;
use tracing::warn;
use uuid::Uuid;

use simian_core::{IndexEntry, NodeId};

use crate::column_families::cf_names;
use crate::serialization::{
    deserialize_entry, deserialize_thumbnail, serialize_entry, serialize_thumbnail,
};

use super::core::RocksDbIndexStore;
use super::error::{StorageError, StorageResult};
use super::helpers::{format_entry_key, format_thumbnail_key, parse_entry_key};

impl RocksDbIndexStore {
    /// Entries held by node `node`, oldest first.
    pub fn load_entries(&self, node: NodeId) -> StorageResult<Vec<IndexEntry>> {
        let cf = self.get_cf(cf_names::ENTRIES)?;
        let prefix = node.as_bytes();

        let mut entries = Vec::new();
        for item in self.db.prefix_iterator_cf(cf, prefix) {
            let (key, value) = item.map_err(|e| StorageError::ReadFailed(e.to_string()))?;

            // Stop once past this node's prefix
            if !key.starts_with(prefix) {
                break;
            }

            let entry = deserialize_entry(&value)?;
            let (_, id) = parse_entry_key(&key)?;
            if id != entry.id() {
                return Err(StorageError::IndexCorrupted {
                    index_name: cf_names::ENTRIES.to_string(),
                    details: format!("key names entry {} but record holds {}", id, entry.id()),
                });
            }
            entries.push(entry);
        }

        Ok(entries)
    }

    /// True if any entry record is stored under `node`.
    pub(crate) fn has_entries(&self, node: NodeId) -> StorageResult<bool> {
        let cf = self.get_cf(cf_names::ENTRIES)?;
        let prefix = node.as_bytes();

        match self.db.prefix_iterator_cf(cf, prefix).next() {
            None => Ok(false),
            Some(item) => {
                let (key, _) = item.map_err(|e| StorageError::ReadFailed(e.to_string()))?;
                Ok(key.starts_with(prefix))
            }
        }
    }

    /// Queue `entry` (and its thumbnail, if any) under `node`.
    pub(crate) fn put_entry(
        &self,
        batch: &mut WriteBatch,
        node: NodeId,
        entry: &IndexEntry,
    ) -> StorageResult<()> {
        let entries_cf = self.get_cf(cf_names::ENTRIES)?;
        batch.put_cf(
            entries_cf,
            format_entry_key(node, entry),
            serialize_entry(entry)?,
        );

        if let Some(thumbnail) = entry.thumbnail() {
            let thumbnails_cf = self.get_cf(cf_names::THUMBNAILS)?;
            batch.put_cf(
                thumbnails_cf,
                format_thumbnail_key(entry.id()),
                serialize_thumbnail(thumbnail)?,
            );
        }
        Ok(())
    }

    /// Queue deletion of every entry held by `node`. Thumbnails stay; they
    /// are keyed by entry id and the entries live on in the children.
    pub(crate) fn delete_entries(&self, batch: &mut WriteBatch, node: NodeId) -> StorageResult<usize> {
        let cf = self.get_cf(cf_names::ENTRIES)?;
        let prefix = node.as_bytes();

        let mut deleted = 0;
        for item in self.db.prefix_iterator_cf(cf, prefix) {
            let (key, _) = item.map_err(|e| StorageError::ReadFailed(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            batch.delete_cf(cf, key);
            deleted += 1;
        }
        Ok(deleted)
    }

    /// Stored thumbnail of entry `entry_id`.
    ///
    /// Entries loaded from this store carry no thumbnail; fetch it here.
    pub fn thumbnail(&self, entry_id: Uuid) -> StorageResult<Option<RgbaImage>> {
        let cf = self.get_cf(cf_names::THUMBNAILS)?;
        let bytes = self
            .db
            .get_cf(cf, format_thumbnail_key(entry_id))
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        match bytes {
            None => Ok(None),
            Some(bytes) => match deserialize_thumbnail(&bytes) {
                Ok(thumbnail) => Ok(Some(thumbnail)),
                Err(e) => {
                    warn!(entry = %entry_id, error = %e, "Unreadable thumbnail");
                    Err(e.into())
                }
            },
        }
    }

    /// Number of stored entry records, duplicates from unfinished splits included.
    pub fn entry_count(&self) -> StorageResult<usize> {
        let cf = self.get_cf(cf_names::ENTRIES)?;
        let mut count = 0;
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            item.map_err(|e| StorageError::ReadFailed(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }
}
