//! Trie insertion and leaf splitting.

use tracing::debug;

use crate::config::constants::index::ROOT_DEPTH;
use crate::config::IndexConfig;
use crate::entry::IndexEntry;
use crate::error::StoreResult;
use crate::node::{IndexNode, NodeState};
use crate::store::IndexStore;

/// Insert `entry` starting at the root.
///
/// A leaf absorbs the entry while every entry it holds is within
/// `split_threshold` of it, or once `max_depth` is reached. Otherwise the
/// leaf splits and the entry moves on to the child keyed by its prefix at
/// the current depth.
pub(crate) fn insert<S>(store: &S, config: &IndexConfig, entry: IndexEntry) -> StoreResult<()>
where
    S: IndexStore + ?Sized,
{
    let mut node = store.root()?;
    let mut depth = ROOT_DEPTH;

    loop {
        if let NodeState::Leaf(entries) = node.state() {
            let worst = worst_difference(entries, &entry);
            if depth >= config.max_depth || worst <= config.split_threshold {
                return store.add_entry(entry, &mut node);
            }

            debug!(
                node = %node.id(),
                depth,
                held = entries.len(),
                worst,
                threshold = config.split_threshold,
                "Splitting leaf"
            );
            split(store, &mut node, depth)?;
        }

        let prefix = entry.fingerprint().prefix(depth);
        node = store.get_or_create_child(&prefix, &mut node)?;
        depth += 1;
    }
}

/// Largest full-resolution difference between `entry` and the held entries;
/// `0.0` for an empty bucket.
fn worst_difference(entries: &[IndexEntry], entry: &IndexEntry) -> f64 {
    entries
        .iter()
        .map(|e| e.fingerprint().distance(entry.fingerprint()))
        .fold(0.0, f64::max)
}

/// Move every held entry one level down, keyed by its prefix at `depth`.
///
/// Entries are copied into the children before the parent's bucket is
/// cleared, so a failure part way through can leave an entry in both places
/// but never in neither.
fn split<S>(store: &S, node: &mut IndexNode, depth: usize) -> StoreResult<()>
where
    S: IndexStore + ?Sized,
{
    let held = node.take_entries();

    for entry in held {
        let prefix = entry.fingerprint().prefix(depth);
        let mut child = store.get_or_create_child(&prefix, node)?;
        store.add_entry(entry, &mut child)?;
    }

    store.remove_entries(node)
}
