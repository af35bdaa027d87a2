//! Node record serialization using bincode.
//!
//! Node records are fixed-layout structs without `skip_serializing_if`
//! attributes, which is what bincode handles best.

use serde::{Deserialize, Serialize};

use simian_core::{ChildRef, Fingerprint, NodeId};

use super::error::SerializationError;

/// What the `nodes` column family stores for one trie node.
///
/// Entries live in their own column family. A record flagged `internal`
/// that still has entries is a split that never finished; it is loaded as
/// a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// `None` for the root only.
    pub parent: Option<NodeId>,
    /// Prefix the node is keyed by under its parent; `None` for the root.
    pub prefix: Option<Fingerprint>,
    pub internal: bool,
    pub children: Vec<ChildRef>,
}

impl NodeRecord {
    pub fn root() -> Self {
        Self {
            parent: None,
            prefix: None,
            internal: false,
            children: Vec::new(),
        }
    }

    pub fn leaf(parent: NodeId, prefix: Fingerprint) -> Self {
        Self {
            parent: Some(parent),
            prefix: Some(prefix),
            internal: false,
            children: Vec::new(),
        }
    }

    /// True if this record was created for `prefix` under `parent`.
    pub fn is_child_of(&self, parent: NodeId, prefix: &Fingerprint) -> bool {
        self.parent == Some(parent) && self.prefix.as_ref() == Some(prefix)
    }

    pub fn child(&self, prefix: &Fingerprint) -> Option<&ChildRef> {
        self.children.iter().find(|c| &c.prefix == prefix)
    }

    /// Add `child` to the child table and mark the node internal.
    pub fn register_child(&mut self, child: ChildRef) {
        self.internal = true;
        if !self.children.iter().any(|c| c.prefix == child.prefix) {
            self.children.push(child);
        }
    }
}

pub fn serialize_node_record(record: &NodeRecord) -> Result<Vec<u8>, SerializationError> {
    bincode::serialize(record).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

pub fn deserialize_node_record(bytes: &[u8]) -> Result<NodeRecord, SerializationError> {
    bincode::deserialize(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
