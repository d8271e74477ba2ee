//! Tests for engine-allocated storage: create / destroy

#![cfg(feature = "dynamic")]

use bintree::util::testing;
use bintree::{DynamicTree, Settings, Side, TreeError};
use rstest::rstest;

#[test]
fn given_unbounded_tree_when_create_then_empty_node() {
    testing::init_test_setup();
    let mut tree: DynamicTree<String> = DynamicTree::new();
    let id = tree.create().unwrap();
    let node = tree.node(id).unwrap();
    assert!(node.is_empty());
    assert_eq!(tree.capacity(), None);
    assert_eq!(tree.len(), 1);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(4)]
fn given_full_arena_when_create_then_out_of_memory_without_panic(#[case] capacity: usize) {
    let mut tree: DynamicTree<u32> = DynamicTree::with_capacity(capacity);
    for _ in 0..capacity {
        tree.create().unwrap();
    }

    let result = tree.create();

    assert!(matches!(result, Err(TreeError::OutOfMemory { capacity: c }) if c == capacity));
    assert!(result.ok().is_none());
    assert_eq!(tree.len(), capacity);
}

#[test]
fn given_leaf_when_destroy_then_released_and_reference_cleared() {
    let mut tree = DynamicTree::with_capacity(2);
    let parent = tree.create_with('p').unwrap();
    let leaf = tree.create_with('l').unwrap();
    tree.append(parent, leaf, Side::Left).unwrap();

    let mut handle = Some(leaf);
    let payload = tree.destroy(&mut handle).unwrap();

    assert_eq!(payload, Some('l'));
    assert!(handle.is_none());
    assert!(!tree.contains(leaf));
    assert_eq!(tree.left(parent), None);
    // the released slot is available again
    tree.create().unwrap();
}

#[test]
fn given_node_with_children_when_destroy_then_not_a_leaf_and_storage_kept() {
    let mut tree = DynamicTree::new();
    let parent = tree.create_with(1).unwrap();
    let child = tree.create_with(2).unwrap();
    tree.append(parent, child, Side::Right).unwrap();

    let mut handle = Some(parent);
    let result = tree.destroy(&mut handle);

    assert!(matches!(result, Err(TreeError::NotALeaf(id)) if id == parent));
    assert_eq!(handle, Some(parent));
    assert!(tree.contains(parent));
    assert_eq!(tree.right(parent), Some(child));
}

#[test]
fn given_absent_reference_when_destroy_then_not_found_no_op() {
    let mut tree: DynamicTree<u8> = DynamicTree::new();
    tree.create().unwrap();
    let mut handle = None;

    assert!(matches!(tree.destroy(&mut handle), Err(TreeError::NotFound)));
    assert!(handle.is_none());
    assert_eq!(tree.len(), 1);
}

#[test]
fn given_destroyed_handle_when_destroyed_again_via_copy_then_invalid_pointer() {
    let mut tree: DynamicTree<u8> = DynamicTree::new();
    let id = tree.create().unwrap();
    let mut first = Some(id);
    let mut copy = Some(id);

    tree.destroy(&mut first).unwrap();

    assert!(matches!(
        tree.destroy(&mut copy),
        Err(TreeError::InvalidPointer(_))
    ));
    assert_eq!(copy, Some(id));
}

#[test]
fn given_settings_when_with_settings_then_capacity_and_depth_applied() {
    let settings = Settings {
        capacity: Some(3),
        max_depth: 16,
        ..Settings::default()
    };
    let tree: DynamicTree<u8> = DynamicTree::with_settings(&settings);
    assert_eq!(tree.capacity(), Some(3));
    assert_eq!(tree.max_depth(), 16);
}
