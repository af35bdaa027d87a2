//! [`IndexStore`] implementation.
//!
//! Each method commits at most one `WriteBatch`, so every individual call
//! is atomic. A split spans several calls and is not.

use rocksdb::WriteBatch;
use tracing::debug;

use simian_core::{
    ChildRef, Fingerprint, IndexEntry, IndexNode, IndexStore, NodeId, StoreError, StoreResult,
};

use crate::serialization::NodeRecord;

use super::core::RocksDbIndexStore;

impl RocksDbIndexStore {
    fn require_record(&self, id: NodeId) -> StoreResult<NodeRecord> {
        self.get_node_record(id)?
            .ok_or(StoreError::NodeNotFound { id })
    }

    fn check_child(record: &NodeRecord, parent: NodeId, prefix: &Fingerprint) -> StoreResult<()> {
        if record.is_child_of(parent, prefix) {
            return Ok(());
        }
        Err(StoreError::KeyCollision {
            parent,
            stored: record
                .prefix
                .as_ref()
                .map(Fingerprint::to_hex)
                .unwrap_or_default(),
            requested: prefix.to_hex(),
        })
    }
}

impl IndexStore for RocksDbIndexStore {
    fn root(&self) -> StoreResult<IndexNode> {
        if let Some(record) = self.get_node_record(NodeId::ROOT)? {
            return Ok(self.load_node(NodeId::ROOT, &record)?);
        }

        let _guard = self.write_lock.lock();
        let record = match self.get_node_record(NodeId::ROOT)? {
            Some(record) => record,
            None => {
                let record = NodeRecord::root();
                let mut batch = WriteBatch::default();
                self.put_node_record(&mut batch, NodeId::ROOT, &record)?;
                self.write(batch)?;
                debug!("Created root node");
                record
            }
        };
        Ok(self.load_node(NodeId::ROOT, &record)?)
    }

    fn child(&self, prefix: &Fingerprint, parent: &IndexNode) -> StoreResult<Option<IndexNode>> {
        let Some(child_ref) = parent.child_ref(prefix) else {
            return Ok(None);
        };

        let record = self.require_record(child_ref.id)?;
        Self::check_child(&record, parent.id(), prefix)?;
        Ok(Some(self.load_node(child_ref.id, &record)?))
    }

    fn get_or_create_child(
        &self,
        prefix: &Fingerprint,
        parent: &mut IndexNode,
    ) -> StoreResult<IndexNode> {
        let parent_id = parent.id();
        let id = parent_id.child(prefix);
        let child_ref = ChildRef {
            prefix: prefix.clone(),
            id,
        };

        let _guard = self.write_lock.lock();
        let existing = self.get_node_record(id)?;
        if let Some(existing) = &existing {
            Self::check_child(existing, parent_id, prefix)?;
        }
        parent.register_child(child_ref.clone())?;

        let mut batch = WriteBatch::default();
        let record = match existing {
            Some(existing) => existing,
            None => {
                let record = NodeRecord::leaf(parent_id, prefix.clone());
                self.put_node_record(&mut batch, id, &record)?;
                debug!(parent = %parent_id, child = %id, prefix_len = prefix.len(), "Created child node");
                record
            }
        };

        let mut parent_record = self.require_record(parent_id)?;
        if parent_record.child(prefix).is_none() || !parent_record.internal {
            parent_record.register_child(child_ref);
            self.put_node_record(&mut batch, parent_id, &parent_record)?;
        }

        if !batch.is_empty() {
            self.write(batch)?;
        }
        Ok(self.load_node(id, &record)?)
    }

    fn add_entry(&self, entry: IndexEntry, node: &mut IndexNode) -> StoreResult<()> {
        if !node.is_leaf() {
            return Err(StoreError::invalid_state(
                node.id(),
                "cannot add an entry to an internal node",
            ));
        }

        let id = node.id();
        let _guard = self.write_lock.lock();
        let record = self.require_record(id)?;
        if record.internal && !self.has_entries(id)? {
            return Err(StoreError::invalid_state(
                id,
                "stored node is internal; snapshot is stale",
            ));
        }

        let mut batch = WriteBatch::default();
        self.put_entry(&mut batch, id, &entry)?;
        self.write(batch)?;

        node.push_entry(entry)
    }

    fn remove_entries(&self, node: &mut IndexNode) -> StoreResult<()> {
        let id = node.id();

        let _guard = self.write_lock.lock();
        let mut record = self.require_record(id)?;
        record.internal = true;

        let mut batch = WriteBatch::default();
        let removed = self.delete_entries(&mut batch, id)?;
        self.put_node_record(&mut batch, id, &record)?;
        self.write(batch)?;

        debug!(node = %id, removed, "Cleared split node");
        node.take_entries();
        Ok(())
    }
}
