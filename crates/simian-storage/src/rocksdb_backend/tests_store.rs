//! `IndexStore` tests for the RocksDB backend.

use image::{Rgba, RgbaImage};
use rocksdb::WriteBatch;
use tempfile::TempDir;

use simian_core::{
    Attributes, ChildRef, Fingerprint, IndexEntry, IndexNode, IndexStore, NodeId, StoreError,
};

use super::core::RocksDbIndexStore;
use super::tests_core::create_temp_db;
use crate::serialization::NodeRecord;

fn entry(value: i16) -> IndexEntry {
    IndexEntry::new(Fingerprint::from_samples(vec![value; 64]), Attributes::new())
}

// =========================================================================
// root / add_entry
// =========================================================================

#[test]
fn test_root_created_on_first_use() {
    println!("=== TEST: root creation ===");
    let (_tmp, db) = create_temp_db();
    println!("BEFORE: {} node records", db.node_count().unwrap());
    assert_eq!(db.node_count().unwrap(), 0);

    let root = db.root().unwrap();
    assert!(root.is_leaf());
    assert_eq!(root.id(), NodeId::ROOT);

    db.root().unwrap();
    println!("AFTER: {} node records", db.node_count().unwrap());
    assert_eq!(db.node_count().unwrap(), 1);
}

#[test]
fn test_add_entry_and_reload() {
    let (_tmp, db) = create_temp_db();
    let mut root = db.root().unwrap();

    let mut attributes = Attributes::new();
    attributes.insert("path".into(), serde_json::json!("a.png"));
    let first = IndexEntry::new(Fingerprint::from_samples(vec![1; 64]), attributes);
    let second = entry(2);

    db.add_entry(first.clone(), &mut root).unwrap();
    db.add_entry(second.clone(), &mut root).unwrap();
    assert_eq!(root.entries().len(), 2);

    let reloaded = db.root().unwrap();
    let ids: Vec<_> = reloaded.entries().iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec![first.id(), second.id()]);
    assert_eq!(reloaded.entries()[0].attributes()["path"], "a.png");
    assert_eq!(db.entry_count().unwrap(), 2);
}

#[test]
fn test_add_entry_to_internal_node_is_refused() {
    let (_tmp, db) = create_temp_db();
    db.root().unwrap();
    let mut internal = IndexNode::with_children(NodeId::ROOT, Vec::new());

    let result = db.add_entry(entry(0), &mut internal);
    assert!(matches!(result, Err(StoreError::InvalidNodeState { .. })));
    assert_eq!(db.entry_count().unwrap(), 0);
}

#[test]
fn test_thumbnail_stored_separately() {
    let (_tmp, db) = create_temp_db();
    let mut root = db.root().unwrap();

    let thumbnail = RgbaImage::from_pixel(8, 4, Rgba([200, 10, 10, 255]));
    let with_thumb = entry(3).with_thumbnail(thumbnail.clone());
    let id = with_thumb.id();
    db.add_entry(with_thumb, &mut root).unwrap();

    let reloaded = db.root().unwrap();
    assert!(reloaded.entries()[0].thumbnail().is_none());
    assert_eq!(db.thumbnail(id).unwrap(), Some(thumbnail));
    assert_eq!(db.thumbnail(uuid::Uuid::new_v4()).unwrap(), None);
}

// =========================================================================
// children / split
// =========================================================================

#[test]
fn test_get_or_create_child_persists_both_records() {
    let (_tmp, db) = create_temp_db();
    let mut root = db.root().unwrap();
    let prefix = Fingerprint::from_samples(vec![7]);

    let child = db.get_or_create_child(&prefix, &mut root).unwrap();
    assert!(child.is_leaf());
    assert!(root.is_internal());

    let root_record = db.get_node_record(NodeId::ROOT).unwrap().unwrap();
    assert!(root_record.internal);
    assert_eq!(root_record.children.len(), 1);

    let child_record = db.get_node_record(child.id()).unwrap().unwrap();
    assert!(child_record.is_child_of(NodeId::ROOT, &prefix));

    let again = db.get_or_create_child(&prefix, &mut root).unwrap();
    assert_eq!(again.id(), child.id());
    assert_eq!(db.node_count().unwrap(), 2);

    let reloaded = db.root().unwrap();
    assert!(db.child(&prefix, &reloaded).unwrap().is_some());
    assert!(db
        .child(&Fingerprint::from_samples(vec![8]), &reloaded)
        .unwrap()
        .is_none());
}

#[test]
fn test_full_split_sequence() {
    println!("=== TEST: split sequence ===");
    let (_tmp, db) = create_temp_db();
    let mut root = db.root().unwrap();
    db.add_entry(entry(0), &mut root).unwrap();
    db.add_entry(entry(50), &mut root).unwrap();

    let held = root.take_entries();
    for e in held {
        let prefix = e.fingerprint().prefix(1);
        let mut child = db.get_or_create_child(&prefix, &mut root).unwrap();
        db.add_entry(e, &mut child).unwrap();
    }
    println!("BEFORE clear: {} entry records", db.entry_count().unwrap());
    assert_eq!(db.entry_count().unwrap(), 4);

    // not yet cleared: the root still loads as a leaf
    assert!(db.root().unwrap().is_leaf());

    db.remove_entries(&mut root).unwrap();
    println!("AFTER clear: {} entry records", db.entry_count().unwrap());
    assert_eq!(db.entry_count().unwrap(), 2);

    let reloaded = db.root().unwrap();
    assert!(reloaded.is_internal());
    assert_eq!(reloaded.children().len(), 2);
    for child_ref in reloaded.children() {
        let child = db.child(&child_ref.prefix, &reloaded).unwrap().unwrap();
        assert_eq!(child.entries().len(), 1);
    }
}

#[test]
fn test_add_entry_through_stale_snapshot_is_refused() {
    println!("=== TEST: add through a snapshot taken before a split ===");
    let (_tmp, db) = create_temp_db();
    let mut stale = db.root().unwrap();

    // split the root through a fresh snapshot
    let mut root = db.root().unwrap();
    db.add_entry(entry(0), &mut root).unwrap();
    db.add_entry(entry(90), &mut root).unwrap();
    for e in root.take_entries() {
        let prefix = e.fingerprint().prefix(1);
        let mut child = db.get_or_create_child(&prefix, &mut root).unwrap();
        db.add_entry(e, &mut child).unwrap();
    }
    db.remove_entries(&mut root).unwrap();
    println!("BEFORE: stale snapshot is_leaf={}", stale.is_leaf());
    assert!(stale.is_leaf());

    let result = db.add_entry(entry(40), &mut stale);
    assert!(matches!(result, Err(StoreError::InvalidNodeState { .. })));
    assert!(stale.entries().is_empty());

    // the children are still reachable
    let reloaded = db.root().unwrap();
    println!("AFTER: root is_internal={}", reloaded.is_internal());
    assert!(reloaded.is_internal());
    assert_eq!(reloaded.children().len(), 2);
    assert_eq!(db.entry_count().unwrap(), 2);
}

#[test]
fn test_add_entry_during_unfinished_split_is_accepted() {
    let (_tmp, db) = create_temp_db();
    let mut root = db.root().unwrap();
    db.add_entry(entry(0), &mut root).unwrap();

    // registering a child flags the record internal while it still holds entries
    let mut snapshot = db.root().unwrap();
    let mut splitting = db.root().unwrap();
    splitting.take_entries();
    db.get_or_create_child(&Fingerprint::from_samples(vec![0]), &mut splitting)
        .unwrap();
    assert!(db.get_node_record(NodeId::ROOT).unwrap().unwrap().internal);

    db.add_entry(entry(1), &mut snapshot).unwrap();
    assert_eq!(db.root().unwrap().entries().len(), 2);
}

#[test]
fn test_dangling_child_reference() {
    let (_tmp, db) = create_temp_db();
    db.root().unwrap();
    let prefix = Fingerprint::from_samples(vec![1]);
    let parent = IndexNode::with_children(
        NodeId::ROOT,
        vec![ChildRef {
            prefix: prefix.clone(),
            id: NodeId::ROOT.child(&prefix),
        }],
    );

    let result = db.child(&prefix, &parent);
    assert!(matches!(result, Err(StoreError::NodeNotFound { .. })));
}

#[test]
fn test_child_record_with_other_prefix_is_a_collision() {
    let (_tmp, db) = create_temp_db();
    let mut root = db.root().unwrap();
    let requested = Fingerprint::from_samples(vec![4]);
    let id = NodeId::ROOT.child(&requested);

    // plant a record at that address that belongs to a different prefix
    let mut batch = WriteBatch::default();
    db.put_node_record(
        &mut batch,
        id,
        &NodeRecord::leaf(NodeId::ROOT, Fingerprint::from_samples(vec![5])),
    )
    .unwrap();
    db.write(batch).unwrap();

    let result = db.get_or_create_child(&requested, &mut root);
    match result {
        Err(StoreError::KeyCollision {
            stored, requested, ..
        }) => {
            assert_eq!(stored, "0005");
            assert_eq!(requested, "0004");
        }
        other => panic!("expected KeyCollision, got {other:?}"),
    }

    // neither the snapshot nor the stored root picked up the child
    assert!(root.is_leaf());
    assert!(root.children().is_empty());
    assert!(!db.get_node_record(NodeId::ROOT).unwrap().unwrap().internal);
}

#[test]
fn test_tree_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let prefix = Fingerprint::from_samples(vec![9]);
    let stored_id;
    {
        let db = RocksDbIndexStore::open(tmp.path()).unwrap();
        let mut root = db.root().unwrap();
        let mut child = db.get_or_create_child(&prefix, &mut root).unwrap();
        let e = entry(9);
        stored_id = e.id();
        db.add_entry(e, &mut child).unwrap();
        db.flush_all().unwrap();
    }

    let db = RocksDbIndexStore::open(tmp.path()).unwrap();
    let root = db.root().unwrap();
    assert!(root.is_internal());
    let child = db.child(&prefix, &root).unwrap().unwrap();
    assert_eq!(child.entries()[0].id(), stored_id);
}
