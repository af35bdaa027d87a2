//! In-memory [`IndexStore`].
//!
//! Lays nodes out the same way the RocksDB store does (one record per node,
//! a child table on the parent, entries kept apart from the internal flag) so
//! that engine tests see the same intermediate states. Nothing is persisted.
//!
//! Thread-safe via `DashMap`.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::entry::IndexEntry;
use crate::error::{StoreError, StoreResult};
use crate::fingerprint::Fingerprint;
use crate::node::{ChildRef, IndexNode, NodeId};
use crate::store::IndexStore;

#[derive(Debug, Clone)]
struct StoredNode {
    parent: Option<NodeId>,
    prefix: Option<Fingerprint>,
    internal: bool,
    children: Vec<ChildRef>,
    entries: Vec<IndexEntry>,
}

impl StoredNode {
    fn leaf(parent: Option<NodeId>, prefix: Option<Fingerprint>) -> Self {
        Self {
            parent,
            prefix,
            internal: false,
            children: Vec::new(),
            entries: Vec::new(),
        }
    }

    // A record that still holds entries is a leaf, even if a split had
    // already started registering children on it.
    fn snapshot(&self, id: NodeId) -> IndexNode {
        if self.internal && self.entries.is_empty() {
            IndexNode::with_children(id, self.children.clone())
        } else {
            IndexNode::with_entries(id, self.entries.clone())
        }
    }

    fn check_identity(&self, parent: NodeId, prefix: &Fingerprint) -> StoreResult<()> {
        if self.parent == Some(parent) && self.prefix.as_ref() == Some(prefix) {
            return Ok(());
        }
        Err(StoreError::KeyCollision {
            parent,
            stored: self
                .prefix
                .as_ref()
                .map(Fingerprint::to_hex)
                .unwrap_or_default(),
            requested: prefix.to_hex(),
        })
    }
}

/// Volatile store backed by a `DashMap`.
#[derive(Debug)]
pub struct InMemoryIndexStore {
    nodes: DashMap<NodeId, StoredNode>,
}

impl InMemoryIndexStore {
    pub fn new() -> Self {
        info!("Created InMemoryIndexStore");
        Self {
            nodes: DashMap::new(),
        }
    }

    /// Number of node records, the root included once it exists.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored entries across all nodes.
    pub fn entry_count(&self) -> usize {
        self.nodes.iter().map(|n| n.entries.len()).sum()
    }
}

impl Default for InMemoryIndexStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexStore for InMemoryIndexStore {
    fn root(&self) -> StoreResult<IndexNode> {
        let stored = self
            .nodes
            .entry(NodeId::ROOT)
            .or_insert_with(|| StoredNode::leaf(None, None));
        Ok(stored.snapshot(NodeId::ROOT))
    }

    fn child(&self, prefix: &Fingerprint, parent: &IndexNode) -> StoreResult<Option<IndexNode>> {
        let Some(child_ref) = parent.child_ref(prefix) else {
            return Ok(None);
        };

        let stored = self
            .nodes
            .get(&child_ref.id)
            .ok_or(StoreError::NodeNotFound { id: child_ref.id })?;
        stored.check_identity(parent.id(), prefix)?;
        Ok(Some(stored.snapshot(child_ref.id)))
    }

    fn get_or_create_child(
        &self,
        prefix: &Fingerprint,
        parent: &mut IndexNode,
    ) -> StoreResult<IndexNode> {
        let parent_id = parent.id();
        let id = parent_id.child(prefix);

        if let Some(existing) = self.nodes.get(&id) {
            existing.check_identity(parent_id, prefix)?;
        }
        parent.register_child(ChildRef {
            prefix: prefix.clone(),
            id,
        })?;

        let child = match self.nodes.entry(id) {
            Entry::Occupied(existing) => {
                existing.get().check_identity(parent_id, prefix)?;
                existing.get().snapshot(id)
            }
            Entry::Vacant(slot) => {
                debug!(parent = %parent_id, child = %id, prefix_len = prefix.len(), "Created child node");
                slot.insert(StoredNode::leaf(Some(parent_id), Some(prefix.clone())))
                    .snapshot(id)
            }
        };

        let mut stored_parent = self
            .nodes
            .get_mut(&parent_id)
            .ok_or(StoreError::NodeNotFound { id: parent_id })?;
        stored_parent.internal = true;
        if !stored_parent.children.iter().any(|c| &c.prefix == prefix) {
            stored_parent.children.push(ChildRef {
                prefix: prefix.clone(),
                id,
            });
        }

        Ok(child)
    }

    fn add_entry(&self, entry: IndexEntry, node: &mut IndexNode) -> StoreResult<()> {
        let mut stored = self
            .nodes
            .get_mut(&node.id())
            .ok_or(StoreError::NodeNotFound { id: node.id() })?;
        if stored.internal && stored.entries.is_empty() {
            return Err(StoreError::invalid_state(
                node.id(),
                "stored node is internal; snapshot is stale",
            ));
        }

        node.push_entry(entry.clone())?;
        stored.entries.push(entry);
        Ok(())
    }

    fn remove_entries(&self, node: &mut IndexNode) -> StoreResult<()> {
        let mut stored = self
            .nodes
            .get_mut(&node.id())
            .ok_or(StoreError::NodeNotFound { id: node.id() })?;
        stored.entries.clear();
        stored.internal = true;

        node.take_entries();
        Ok(())
    }
}
