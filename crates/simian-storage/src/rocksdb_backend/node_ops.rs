//! Node record operations.

use rocksdb::WriteBatch;

use simian_core::{IndexNode, NodeId};

use crate::column_families::cf_names;
use crate::serialization::{deserialize_node_record, serialize_node_record, NodeRecord};

use super::core::RocksDbIndexStore;
use super::error::{StorageError, StorageResult};

impl RocksDbIndexStore {
    /// Read the record of node `id`.
    pub fn get_node_record(&self, id: NodeId) -> StorageResult<Option<NodeRecord>> {
        let cf = self.get_cf(cf_names::NODES)?;
        let bytes = self
            .db
            .get_cf(cf, id.as_bytes())
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        bytes
            .map(|b| deserialize_node_record(&b).map_err(StorageError::from))
            .transpose()
    }

    /// Queue a write of `record` under `id`.
    pub(crate) fn put_node_record(
        &self,
        batch: &mut WriteBatch,
        id: NodeId,
        record: &NodeRecord,
    ) -> StorageResult<()> {
        let cf = self.get_cf(cf_names::NODES)?;
        batch.put_cf(cf, id.as_bytes(), serialize_node_record(record)?);
        Ok(())
    }

    /// Build the snapshot of node `id` from its record and entries.
    ///
    /// A record that still holds entries loads as a leaf, even when flagged
    /// internal by a split that did not finish.
    pub(crate) fn load_node(&self, id: NodeId, record: &NodeRecord) -> StorageResult<IndexNode> {
        let entries = self.load_entries(id)?;
        if record.internal && entries.is_empty() {
            Ok(IndexNode::with_children(id, record.children.clone()))
        } else {
            Ok(IndexNode::with_entries(id, entries))
        }
    }

    /// Number of node records.
    pub fn node_count(&self) -> StorageResult<usize> {
        let cf = self.get_cf(cf_names::NODES)?;
        let mut count = 0;
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            item.map_err(|e| StorageError::ReadFailed(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }
}
