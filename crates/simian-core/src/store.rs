//! Persistence seam for the trie.
//!
//! The engine only ever talks to nodes through an [`IndexStore`]. Every call
//! is synchronous and fallible; the engine never retries and stops at the
//! first error.

use crate::entry::IndexEntry;
use crate::error::StoreResult;
use crate::fingerprint::Fingerprint;
use crate::node::IndexNode;

/// Node-keyed storage for the fingerprint trie.
///
/// Nodes handed out are snapshots. Methods taking `&mut IndexNode` persist
/// their change and update the snapshot in place so the caller can keep
/// working with it.
pub trait IndexStore: Send + Sync {
    /// The root node, created as an empty leaf on first use.
    fn root(&self) -> StoreResult<IndexNode>;

    /// The child of `parent` keyed by `prefix`, if one exists. Never creates.
    fn child(&self, prefix: &Fingerprint, parent: &IndexNode) -> StoreResult<Option<IndexNode>>;

    /// The child of `parent` keyed by `prefix`, creating an empty leaf and
    /// registering it on `parent` if needed.
    ///
    /// `parent` must be internal or an empty leaf.
    fn get_or_create_child(
        &self,
        prefix: &Fingerprint,
        parent: &mut IndexNode,
    ) -> StoreResult<IndexNode>;

    /// Append `entry` to the leaf `node`.
    fn add_entry(&self, entry: IndexEntry, node: &mut IndexNode) -> StoreResult<()>;

    /// Drop every entry held by `node`, leaving it internal. Used at the
    /// end of a split, after the entries have been copied to the children.
    fn remove_entries(&self, node: &mut IndexNode) -> StoreResult<()>;
}
