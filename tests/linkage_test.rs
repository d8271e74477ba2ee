//! Tests for node lifecycle and linkage on caller-provided storage

use bintree::util::testing;
use bintree::{NodeId, Side, StaticTree, TreeError, TreeNode};
use rstest::{fixture, rstest};

#[fixture]
fn pair() -> (StaticTree<&'static str>, NodeId, NodeId) {
    testing::init_test_setup();
    let mut tree = StaticTree::new();
    let a = tree.provide(TreeNode::with_value("a"));
    let b = tree.provide(TreeNode::with_value("b"));
    (tree, a, b)
}

// ============================================================
// Depth
// ============================================================

#[rstest]
fn given_absent_node_when_depth_then_zero(pair: (StaticTree<&'static str>, NodeId, NodeId)) {
    let (tree, _, _) = pair;
    assert_eq!(tree.depth(None), 0);
}

#[rstest]
fn given_single_node_when_depth_then_one(pair: (StaticTree<&'static str>, NodeId, NodeId)) {
    let (tree, a, b) = pair;
    assert_eq!(tree.depth(Some(a)), 1);
    assert_eq!(tree.depth(Some(b)), 1);
}

#[rstest]
#[case(Side::Left)]
#[case(Side::Right)]
fn given_one_child_when_depth_then_two(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
    #[case] side: Side,
) {
    let (mut tree, a, b) = pair;
    tree.append(a, b, side).unwrap();
    assert_eq!(tree.depth(Some(a)), 2);
    assert_eq!(tree.depth(Some(b)), 1);
}

#[test]
fn given_unbalanced_tree_when_depth_then_counts_deeper_side() {
    let mut tree: StaticTree<u32> = StaticTree::new();
    let ids = tree.provide_empty(5);
    tree.append(ids[0], ids[1], Side::Left).unwrap();
    tree.append(ids[0], ids[2], Side::Right).unwrap();
    tree.append(ids[2], ids[3], Side::Left).unwrap();
    tree.append(ids[3], ids[4], Side::Right).unwrap();
    assert_eq!(tree.depth(Some(ids[0])), 4);
    for id in &ids {
        assert!(tree.depth(Some(*id)) >= 1);
    }
}

#[test]
fn given_long_chain_when_depth_then_no_stack_exhaustion() {
    let mut tree: StaticTree<u32> = StaticTree::new();
    let ids = tree.provide_empty(100_000);
    // bottom-up, so every target is still a root when linked
    for pair in ids.windows(2).rev() {
        tree.append(pair[0], pair[1], Side::Left).unwrap();
    }
    assert_eq!(tree.depth(Some(ids[0])), 100_000);
}

// ============================================================
// Append
// ============================================================

#[rstest]
fn given_free_slot_when_append_then_links_both_ways(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
) {
    let (mut tree, a, b) = pair;
    tree.append(a, b, Side::Left).unwrap();
    assert_eq!(tree.left(a), Some(b));
    assert_eq!(tree.right(a), None);
    assert_eq!(tree.parent(b), Some(a));
    assert!(tree.is_attached(b));
    assert!(!tree.is_leaf(a));
}

#[rstest]
fn given_occupied_slot_when_append_then_slot_occupied_and_subtree_kept(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
) {
    let (mut tree, a, b) = pair;
    let c = tree.provide(TreeNode::with_value("c"));
    tree.append(a, b, Side::Right).unwrap();

    let result = tree.append(a, c, Side::Right);

    assert!(matches!(
        result,
        Err(TreeError::SlotOccupied { parent, side: Side::Right }) if parent == a
    ));
    assert_eq!(tree.right(a), Some(b));
    assert_eq!(tree.parent(b), Some(a));
    assert_eq!(tree.parent(c), None);
}

#[rstest]
#[case(0x02)]
#[case(0x03)]
#[case(0xff)]
fn given_unknown_mode_when_append_then_invalid_argument_and_no_mutation(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
    #[case] mode: u8,
) {
    let (mut tree, a, b) = pair;
    let before_a = tree.node(a).unwrap().clone();
    let before_b = tree.node(b).unwrap().clone();

    let result = tree.append_mode(a, b, mode);

    assert!(matches!(result, Err(TreeError::InvalidArgument(_))));
    assert_eq!(tree.node(a).unwrap(), &before_a);
    assert_eq!(tree.node(b).unwrap(), &before_b);
}

#[rstest]
#[case(Side::LEFT_MODE, Side::Left)]
#[case(Side::RIGHT_MODE, Side::Right)]
fn given_raw_mode_when_append_then_uses_matching_slot(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
    #[case] mode: u8,
    #[case] side: Side,
) {
    let (mut tree, a, b) = pair;
    tree.append_mode(a, b, mode).unwrap();
    assert_eq!(tree.child(a, side), Some(b));
}

#[rstest]
fn given_dead_handle_when_append_then_invalid_pointer(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
) {
    let (mut tree, a, _) = pair;
    let foreign = {
        let mut other = StaticTree::new();
        other.provide_empty(3);
        other.provide(TreeNode::with_value("x"))
    };
    assert!(matches!(
        tree.append(a, foreign, Side::Left),
        Err(TreeError::InvalidPointer(_))
    ));
    assert!(matches!(
        tree.append(foreign, a, Side::Left),
        Err(TreeError::InvalidPointer(_))
    ));
    assert!(tree.is_leaf(a));
}

#[rstest]
fn given_attached_node_when_append_elsewhere_then_already_attached(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
) {
    let (mut tree, a, b) = pair;
    let c = tree.provide(TreeNode::with_value("c"));
    tree.append(a, b, Side::Left).unwrap();

    let result = tree.append(c, b, Side::Left);

    assert!(matches!(
        result,
        Err(TreeError::AlreadyAttached { node, parent }) if node == b && parent == a
    ));
    assert_eq!(tree.left(c), None);
    assert_eq!(tree.parent(b), Some(a));
}

#[rstest]
fn given_node_when_append_to_itself_then_cycle_detected(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
) {
    let (mut tree, a, _) = pair;
    assert!(matches!(
        tree.append(a, a, Side::Left),
        Err(TreeError::CycleDetected(id)) if id == a
    ));
    assert!(tree.is_leaf(a));
}

#[rstest]
fn given_root_when_append_below_own_descendant_then_cycle_detected(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
) {
    let (mut tree, a, b) = pair;
    tree.append(a, b, Side::Left).unwrap();
    assert!(matches!(
        tree.append(b, a, Side::Right),
        Err(TreeError::CycleDetected(id)) if id == a
    ));
    assert_eq!(tree.right(b), None);
    assert_eq!(tree.parent(a), None);
}

// ============================================================
// Delete
// ============================================================

#[rstest]
#[case(Side::Left)]
#[case(Side::Right)]
fn given_node_with_child_when_delete_then_not_a_leaf(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
    #[case] side: Side,
) {
    let (mut tree, a, b) = pair;
    tree.append(a, b, side).unwrap();
    assert!(matches!(tree.delete(a), Err(TreeError::NotALeaf(id)) if id == a));
    assert_eq!(tree.child(a, side), Some(b));
    assert_eq!(tree.value(a), Some(&"a"));
}

#[rstest]
fn given_leaf_when_delete_then_parent_slot_cleared_and_node_reset(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
) {
    let (mut tree, a, b) = pair;
    tree.append(a, b, Side::Right).unwrap();

    let payload = tree.delete(b).unwrap();

    assert_eq!(payload, Some("b"));
    assert_eq!(tree.right(a), None);
    assert!(tree.node(b).unwrap().is_empty());
}

#[rstest]
fn given_append_then_delete_then_parent_restored(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
) {
    let (mut tree, a, b) = pair;
    let before = tree.node(a).unwrap().clone();

    tree.append(a, b, Side::Left).unwrap();
    tree.delete(b).unwrap();

    assert_eq!(tree.node(a).unwrap(), &before);
    assert!(tree.node(b).unwrap().is_empty());
    // the slot is usable again
    tree.append(a, b, Side::Left).unwrap();
}

#[rstest]
fn given_detached_empty_node_when_delete_then_succeeds(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
) {
    let (mut tree, _, _) = pair;
    let empty = tree.provide(TreeNode::new());
    assert_eq!(tree.delete(empty).unwrap(), None);
}

#[rstest]
fn given_dead_handle_when_delete_then_invalid_pointer(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
) {
    let (_, a, _) = pair;
    let mut empty: StaticTree<&'static str> = StaticTree::new();
    assert!(matches!(empty.delete(a), Err(TreeError::InvalidPointer(_))));
}

// ============================================================
// Payload
// ============================================================

#[rstest]
fn given_node_when_set_value_then_previous_payload_returned(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
) {
    let (mut tree, a, _) = pair;
    assert_eq!(tree.set_value(a, "z").unwrap(), Some("a"));
    assert_eq!(tree.value(a), Some(&"z"));
    if let Some(v) = tree.value_mut(a) {
        *v = "y";
    }
    assert_eq!(tree.take_value(a), Some("y"));
    assert_eq!(tree.value(a), None);
}

#[rstest]
fn given_dead_handle_when_accessing_payload_then_set_fails_and_get_is_empty(
    pair: (StaticTree<&'static str>, NodeId, NodeId),
) {
    let (_, a, _) = pair;
    let mut empty: StaticTree<&'static str> = StaticTree::new();
    assert!(matches!(
        empty.set_value(a, "x"),
        Err(TreeError::InvalidPointer(_))
    ));
    assert_eq!(empty.value(a), None);
}
