//! RocksDB column family definitions.
//!
//! | Name | Purpose | Key Format | Optimization |
//! |------|---------|------------|--------------|
//! | nodes | Node records (parent, prefix, child table) | NodeId (16 bytes) | Bloom filter, point lookup |
//! | entries | Entries held by leaves | NodeId (16) + created_at micros (8) + entry UUID (16) | 16-byte prefix extractor |
//! | thumbnails | PNG thumbnails | entry UUID (16 bytes) | Large blocks, no compression |
//! | system | Format version, index parameters | string key | No compression |
//!
//! All column families share one LRU block cache.

use rocksdb::{BlockBasedOptions, Cache, ColumnFamilyDescriptor, Options, SliceTransform};

use simian_core::NodeId;

pub mod cf_names {
    /// Node records.
    pub const NODES: &str = "nodes";

    /// Leaf entries, keyed by owning node, creation time, then entry id.
    pub const ENTRIES: &str = "entries";

    /// Thumbnails, keyed by entry id. Entries keep their id when a split
    /// moves them, so thumbnails never move.
    pub const THUMBNAILS: &str = "thumbnails";

    /// System metadata (rare access, no compression).
    pub const SYSTEM: &str = "system";

    pub const ALL: &[&str] = &[NODES, ENTRIES, THUMBNAILS, SYSTEM];
}

pub fn nodes_options(cache: &Cache) -> Options {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    block_opts.set_bloom_filter(10.0, false);
    block_opts.set_cache_index_and_filter_blocks(true);

    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_opts);
    opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
    opts.optimize_for_point_lookup(64);
    opts.create_if_missing(true);

    opts
}

pub fn entries_options(cache: &Cache) -> Options {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    block_opts.set_bloom_filter(10.0, false);
    block_opts.set_cache_index_and_filter_blocks(true);

    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_opts);
    opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
    opts.set_prefix_extractor(SliceTransform::create_fixed_prefix(NodeId::LEN));
    opts.create_if_missing(true);

    opts
}

pub fn thumbnails_options(cache: &Cache) -> Options {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    block_opts.set_block_size(64 * 1024);
    block_opts.set_cache_index_and_filter_blocks(true);

    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_opts);
    // PNG is already compressed
    opts.set_compression_type(rocksdb::DBCompressionType::None);
    opts.create_if_missing(true);

    opts
}

pub fn system_options() -> Options {
    let mut opts = Options::default();
    opts.set_compression_type(rocksdb::DBCompressionType::None);
    opts.create_if_missing(true);
    opts
}

pub fn get_column_family_descriptors(cache: &Cache) -> Vec<ColumnFamilyDescriptor> {
    vec![
        ColumnFamilyDescriptor::new(cf_names::NODES, nodes_options(cache)),
        ColumnFamilyDescriptor::new(cf_names::ENTRIES, entries_options(cache)),
        ColumnFamilyDescriptor::new(cf_names::THUMBNAILS, thumbnails_options(cache)),
        ColumnFamilyDescriptor::new(cf_names::SYSTEM, system_options()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_names_unique() {
        let mut names = cf_names::ALL.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), cf_names::ALL.len());
    }

    #[test]
    fn test_descriptors_cover_all_names() {
        let cache = Cache::new_lru_cache(1024 * 1024);
        let descriptors = get_column_family_descriptors(&cache);
        assert_eq!(descriptors.len(), cf_names::ALL.len());
    }
}
