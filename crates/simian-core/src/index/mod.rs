//! The image index: adaptive fingerprint trie over an [`IndexStore`].
//!
//! # Example
//!
//! ```
//! use simian_core::{Attributes, Fingerprint, ImageIndex, IndexConfig, IndexEntry};
//! use simian_core::stubs::InMemoryIndexStore;
//!
//! let index = ImageIndex::new(InMemoryIndexStore::new(), IndexConfig::default()).unwrap();
//! let fingerprint = Fingerprint::from_samples(vec![0; 64]);
//! let id = index
//!     .insert_entry(IndexEntry::new(fingerprint.clone(), Attributes::new()))
//!     .unwrap();
//!
//! let matches = index.find_nearest_to(&fingerprint, 10, 0.05).unwrap();
//! assert_eq!(matches[0].entry.id(), id);
//! ```

mod gather;
mod insert;


use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::constants::index::ROOT_DEPTH;
use crate::config::IndexConfig;
use crate::entry::{Attributes, IndexEntry};
use crate::error::{CoreResult, StoreError};
use crate::fingerprint::Fingerprint;
use crate::store::IndexStore;

use gather::Gather;

/// A search hit.
#[derive(Debug, Clone)]
pub struct NearMatch {
    pub entry: IndexEntry,
    /// Full-resolution distance to the query.
    pub difference: f64,
}

/// Shape of the trie, from a full walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub nodes: usize,
    pub leaves: usize,
    pub internal_nodes: usize,
    pub entries: usize,
    /// Deepest level holding a node; the root is level 1.
    pub max_depth: usize,
}

/// Perceptual image index.
pub struct ImageIndex<S> {
    store: S,
    config: IndexConfig,
}

impl<S: IndexStore> ImageIndex<S> {
    /// # Errors
    ///
    /// `CoreError::InvalidConfig` if `config` does not validate.
    pub fn new(store: S, config: IndexConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Fingerprint `image` and index it with `attributes`.
    pub fn insert(&self, image: &DynamicImage, attributes: Attributes) -> CoreResult<Uuid> {
        let entry = IndexEntry::from_image(image, attributes, self.config.thumbnail_size)?;
        self.insert_entry(entry)
    }

    /// Index a prepared entry. Identical entries are not deduplicated.
    #[instrument(skip(self, entry), fields(id = %entry.id()))]
    pub fn insert_entry(&self, entry: IndexEntry) -> CoreResult<Uuid> {
        let id = entry.id();
        insert::insert(&self.store, &self.config, entry)?;
        debug!("Inserted entry");
        Ok(id)
    }

    /// Entries similar to `image`, closest first.
    pub fn find_nearest(
        &self,
        image: &DynamicImage,
        max_results: usize,
        max_difference: f64,
    ) -> CoreResult<Vec<NearMatch>> {
        let query = Fingerprint::from_image(image)?;
        self.find_nearest_to(&query, max_results, max_difference)
    }

    /// Up to `max_results` entries within `max_difference` of `query`,
    /// sorted by increasing difference.
    ///
    /// The search is pruned and best-effort: it stops as soon as the budget
    /// is filled, so it may miss closer entries in branches it never
    /// reached. `max_difference` is raised to `split_threshold` when lower.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub fn find_nearest_to(
        &self,
        query: &Fingerprint,
        max_results: usize,
        max_difference: f64,
    ) -> CoreResult<Vec<NearMatch>> {
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let effective = max_difference.max(self.config.split_threshold);
        let root = self.store.root()?;

        let mut gather = Gather::new(&self.store, query, max_results, effective);
        if gather.gather(&root, ROOT_DEPTH)?.is_continue() {
            let _ = gather.scan(&root);
        }

        let mut results = gather.into_results();
        results.sort_by(|a, b| a.difference.total_cmp(&b.difference));
        debug!(found = results.len(), effective, "Search complete");
        Ok(results)
    }

    /// Walk the whole trie and count what is in it.
    pub fn stats(&self) -> CoreResult<IndexStats> {
        let mut stats = IndexStats::default();
        let mut pending = vec![(self.store.root()?, ROOT_DEPTH)];

        while let Some((node, depth)) = pending.pop() {
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);

            if node.is_leaf() {
                stats.leaves += 1;
                stats.entries += node.entries().len();
                continue;
            }

            stats.internal_nodes += 1;
            for child_ref in node.children() {
                let child = self
                    .store
                    .child(&child_ref.prefix, &node)?
                    .ok_or(StoreError::NodeNotFound { id: child_ref.id })?;
                pending.push((child, depth + 1));
            }
        }

        Ok(stats)
    }
}
