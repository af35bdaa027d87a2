//! Trie nodes.
//!
//! A node is either a leaf holding entries or an internal node holding one
//! child reference per distinct prefix; never both. Nodes carry no parent
//! pointer: the engine passes depth and parent down as it descends.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::entry::IndexEntry;
use crate::error::{StoreError, StoreResult};
use crate::fingerprint::Fingerprint;

/// Storage address of a node.
///
/// The root has a fixed id; every other id is the first 16 bytes of
/// `SHA-256(parent_id || prefix bytes)`, so the same path of prefixes always
/// leads to the same address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId([u8; 16]);

impl NodeId {
    pub const ROOT: NodeId = NodeId([0u8; 16]);

    pub const LEN: usize = 16;

    /// Address of the child of `self` keyed by `prefix`.
    pub fn child(&self, prefix: &Fingerprint) -> NodeId {
        let mut hasher = Sha256::new();
        hasher.update(self.0);
        hasher.update(prefix.to_bytes());
        let digest = hasher.finalize();

        let mut id = [0u8; 16];
        id.copy_from_slice(&digest[..16]);
        NodeId(id)
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<NodeId> {
        <[u8; 16]>::try_from(bytes).ok().map(NodeId)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A parent's record of one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRef {
    /// Full prefix the child is keyed by; children are matched on it exactly.
    pub prefix: Fingerprint,
    pub id: NodeId,
}

#[derive(Debug, Clone)]
pub enum NodeState {
    Leaf(Vec<IndexEntry>),
    Internal(Vec<ChildRef>),
}

/// A node as loaded from a store.
///
/// This is a snapshot: mutating it does not persist anything. Stores use the
/// mutators below to keep their returned snapshots in step with what they
/// wrote.
#[derive(Debug, Clone)]
pub struct IndexNode {
    id: NodeId,
    state: NodeState,
}

impl IndexNode {
    pub fn new_leaf(id: NodeId) -> Self {
        Self::with_entries(id, Vec::new())
    }

    pub fn with_entries(id: NodeId, entries: Vec<IndexEntry>) -> Self {
        Self {
            id,
            state: NodeState::Leaf(entries),
        }
    }

    pub fn with_children(id: NodeId, children: Vec<ChildRef>) -> Self {
        Self {
            id,
            state: NodeState::Internal(children),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.state, NodeState::Leaf(_))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.state, NodeState::Internal(_))
    }

    /// Entries of a leaf; empty for internal nodes.
    pub fn entries(&self) -> &[IndexEntry] {
        match &self.state {
            NodeState::Leaf(entries) => entries.as_slice(),
            NodeState::Internal(_) => &[],
        }
    }

    /// Children of an internal node; empty for leaves.
    pub fn children(&self) -> &[ChildRef] {
        match &self.state {
            NodeState::Internal(children) => children.as_slice(),
            NodeState::Leaf(_) => &[],
        }
    }

    pub fn child_ref(&self, prefix: &Fingerprint) -> Option<&ChildRef> {
        self.children().iter().find(|c| &c.prefix == prefix)
    }

    /// Append an entry. Fails on internal nodes.
    pub fn push_entry(&mut self, entry: IndexEntry) -> StoreResult<()> {
        match &mut self.state {
            NodeState::Leaf(entries) => {
                entries.push(entry);
                Ok(())
            }
            NodeState::Internal(_) => Err(StoreError::invalid_state(
                self.id,
                "cannot add an entry to an internal node",
            )),
        }
    }

    /// Record a child. An empty leaf becomes internal; a leaf that still
    /// holds entries is refused. Registering the same prefix twice is a no-op.
    pub fn register_child(&mut self, child: ChildRef) -> StoreResult<()> {
        if let NodeState::Leaf(entries) = &self.state {
            if !entries.is_empty() {
                return Err(StoreError::invalid_state(
                    self.id,
                    format!(
                        "cannot register a child while {} entries are still held",
                        entries.len()
                    ),
                ));
            }
            self.state = NodeState::Internal(Vec::new());
        }

        if let NodeState::Internal(children) = &mut self.state {
            if !children.iter().any(|c| c.prefix == child.prefix) {
                children.push(child);
            }
        }
        Ok(())
    }

    /// Empty the bucket and turn the node internal, returning what it held.
    ///
    /// Internal nodes are left as they are.
    pub fn take_entries(&mut self) -> Vec<IndexEntry> {
        match std::mem::replace(&mut self.state, NodeState::Internal(Vec::new())) {
            NodeState::Leaf(entries) => entries,
            internal => {
                self.state = internal;
                Vec::new()
            }
        }
    }
}
