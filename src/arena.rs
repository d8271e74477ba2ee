use std::fmt;
use std::marker::PhantomData;

use generational_arena::Arena;
use tracing::{debug, instrument, trace};

use crate::config::Settings;
use crate::errors::{TreeError, TreeResult};
use crate::node::{NodeId, Side, TreeNode};
#[cfg(feature = "dynamic")]
use crate::storage::Dynamic;
use crate::storage::{Static, StorageMode};

/// Default bound on tree depth for the whole-subtree operations. Walks
/// recurse once per level and must fit a 2 MiB thread stack at this depth.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Binary tree whose nodes live in a generational arena.
///
/// Links are arena handles: children are owned through `left`/`right`, the
/// `parent` link is a plain back reference used for O(1) unlinking. The
/// storage marker `M` decides how node slots are provisioned, see
/// [`crate::storage`]. Everything structural is shared by both modes.
///
/// Whole-subtree operations (traversals, teardown, rendering) refuse trees
/// deeper than [`Tree::max_depth`] up front. Traversals recurse per level,
/// so the bound is what keeps them off the end of the stack; teardown and
/// rendering keep their own stack.
pub struct Tree<T, M> {
    pub(crate) arena: Arena<TreeNode<T>>,
    capacity: Option<usize>,
    max_depth: usize,
    _mode: PhantomData<M>,
}

/// Tree over caller-provided nodes.
pub type StaticTree<T> = Tree<T, Static>;

/// Tree over engine-allocated nodes.
#[cfg(feature = "dynamic")]
pub type DynamicTree<T> = Tree<T, Dynamic>;

impl<T: fmt::Debug, M: StorageMode> fmt::Debug for Tree<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("mode", &M::NAME)
            .field("len", &self.arena.len())
            .field("capacity", &self.capacity)
            .field("max_depth", &self.max_depth)
            .field("nodes", &self.arena.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<T, M: StorageMode> Tree<T, M> {
    fn with_arena(arena: Arena<TreeNode<T>>, capacity: Option<usize>) -> Self {
        Self {
            arena,
            capacity,
            max_depth: DEFAULT_MAX_DEPTH,
            _mode: PhantomData,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// Slot bound of an engine-allocated tree, `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Number of live node slots, attached or not.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.arena.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.left)
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.right)
    }

    pub fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.node(id).and_then(|n| n.child(side))
    }

    /// Dead handles are not leaves.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(TreeNode::is_leaf)
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.parent(id).is_some()
    }

    /// Topmost ancestor of `id`, `id` itself for a root.
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.node(id).map(|_| id)?;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        Some(current)
    }

    fn live(&self, what: &str, id: NodeId) -> TreeResult<&TreeNode<T>> {
        self.arena.get(id.0).ok_or_else(|| TreeError::dead(what, id))
    }

    fn live_mut(&mut self, what: &str, id: NodeId) -> TreeResult<&mut TreeNode<T>> {
        self.arena
            .get_mut(id.0)
            .ok_or_else(|| TreeError::dead(what, id))
    }

    /// Resets a detached node to the empty state and returns its old payload.
    ///
    /// Contract: `id` is live and the node is neither attached nor has
    /// children. Violations trip a debug assertion; release builds leave the
    /// node untouched and return `None`.
    #[instrument(level = "trace", skip(self))]
    pub fn init(&mut self, id: NodeId) -> Option<T> {
        let node = self.arena.get_mut(id.0);
        debug_assert!(node.is_some(), "init on dead node {}", id);
        let node = node?;
        debug_assert!(
            node.parent.is_none() && node.is_leaf(),
            "init on linked node {}",
            id
        );
        if node.parent.is_some() || !node.is_leaf() {
            return None;
        }
        node.reset()
    }

    /// Stores `value` in the node and returns the payload it replaces.
    #[instrument(level = "trace", skip(self, value))]
    pub fn set_value(&mut self, id: NodeId, value: T) -> TreeResult<Option<T>> {
        let node = self.live_mut("target", id)?;
        Ok(node.value.replace(value))
    }

    /// Payload of `id`; `None` for an empty node or a dead handle.
    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.node(id).and_then(|n| n.value.as_ref())
    }

    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.arena.get_mut(id.0).and_then(|n| n.value.as_mut())
    }

    pub fn take_value(&mut self, id: NodeId) -> Option<T> {
        self.arena.get_mut(id.0).and_then(|n| n.value.take())
    }

    /// Attaches `node` as the `side` child of `target`.
    ///
    /// Nothing is modified unless every check passes:
    /// - both handles live, else [`TreeError::InvalidPointer`]
    /// - `node` not attached anywhere, else [`TreeError::AlreadyAttached`]
    /// - `node` is neither `target` nor one of its ancestors, else
    ///   [`TreeError::CycleDetected`]
    /// - the slot is free, else [`TreeError::SlotOccupied`]; an existing
    ///   subtree is never overwritten.
    #[instrument(level = "trace", skip(self))]
    pub fn append(&mut self, target: NodeId, node: NodeId, side: Side) -> TreeResult<()> {
        let target_node = self.live("target", target)?;
        let new_node = self.live("new node", node)?;

        if let Some(parent) = new_node.parent {
            return Err(TreeError::AlreadyAttached { node, parent });
        }
        if target_node.child(side).is_some() {
            return Err(TreeError::SlotOccupied {
                parent: target,
                side,
            });
        }
        // node is a root here, so a cycle means target sits inside node's subtree
        let mut ancestor = Some(target);
        while let Some(current) = ancestor {
            if current == node {
                return Err(TreeError::CycleDetected(node));
            }
            ancestor = self.parent(current);
        }

        *self.live_mut("target", target)?.slot_mut(side) = Some(node);
        self.live_mut("new node", node)?.parent = Some(target);
        debug!("Linked {} as {} child of {}", node, side, target);
        Ok(())
    }

    /// [`Tree::append`] with a raw mode value, see [`Side::from_mode`].
    ///
    /// Handles are validated before the mode.
    pub fn append_mode(&mut self, target: NodeId, node: NodeId, mode: u8) -> TreeResult<()> {
        self.live("target", target)?;
        self.live("new node", node)?;
        let side = Side::from_mode(mode)?;
        self.append(target, node, side)
    }

    /// Unlinks a leaf from its parent and resets it, returning its payload.
    ///
    /// Fails with [`TreeError::NotALeaf`] while the node has children, so a
    /// subtree is never dropped by accident.
    #[instrument(level = "trace", skip(self))]
    pub fn delete(&mut self, id: NodeId) -> TreeResult<Option<T>> {
        let node = self.live("node", id)?;
        if !node.is_leaf() {
            return Err(TreeError::NotALeaf(id));
        }

        if let Some(parent_id) = node.parent {
            if let Some(parent) = self.arena.get_mut(parent_id.0) {
                if parent.left == Some(id) {
                    parent.left = None;
                }
                if parent.right == Some(id) {
                    parent.right = None;
                }
            }
            trace!("Unlinked {} from {}", id, parent_id);
        }

        Ok(self.live_mut("node", id)?.reset())
    }

    /// Height of the subtree at `root`: 0 for `None` or a dead handle,
    /// otherwise `1 + max(depth(left), depth(right))`.
    ///
    /// Walks with an explicit stack, so it is safe on degenerate trees and is
    /// what the whole-subtree operations use to check their depth bound.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self, root: Option<NodeId>) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(NodeId, usize)> = root.into_iter().map(|id| (id, 1)).collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            max_depth = max_depth.max(depth);
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }

        max_depth
    }

    pub(crate) fn check_depth(&self, root: NodeId) -> TreeResult<()> {
        let depth = self.depth(Some(root));
        if depth > self.max_depth {
            return Err(TreeError::DepthLimit {
                depth,
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    /// Structurally removes the subtree referenced by `root`, bottom-up.
    ///
    /// Storage is kept: every node of the subtree ends up empty and detached.
    /// On success `root` is `None` and the payloads are returned in post-order.
    /// `None` reports [`TreeError::NotFound`]. A failure half way leaves the
    /// already removed part removed.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_subtree(&mut self, root: &mut Option<NodeId>) -> TreeResult<Vec<T>> {
        let id = root.ok_or(TreeError::NotFound)?;
        self.live("subtree root", id)?;
        self.check_depth(id)?;

        let payloads = self.teardown(root, |tree, id| tree.delete(id))?;
        debug!("Deleted subtree at {}: {} payloads", id, payloads.len());
        Ok(payloads)
    }

    /// Handles of the subtree at `root` in post-order, children before
    /// their parent.
    pub(crate) fn post_order_ids(&self, root: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            ids.push(id);
            stack.extend(node.left);
            stack.extend(node.right);
        }
        // node, right, left reversed is left, right, node
        ids.reverse();
        ids
    }

    /// Post-order teardown shared by both storage modes. `remove` detaches
    /// (and possibly releases) one leaf; `slot` is cleared once its node is gone.
    pub(crate) fn teardown<F>(
        &mut self,
        slot: &mut Option<NodeId>,
        mut remove: F,
    ) -> TreeResult<Vec<T>>
    where
        F: FnMut(&mut Self, NodeId) -> TreeResult<Option<T>>,
    {
        let root = slot.ok_or(TreeError::NotFound)?;
        let mut payloads = Vec::new();
        for id in self.post_order_ids(root) {
            if let Some(value) = remove(self, id)? {
                payloads.push(value);
            }
        }
        *slot = None;
        Ok(payloads)
    }
}

impl<T> Default for Tree<T, Static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T, Static> {
    pub fn new() -> Self {
        Self::with_arena(Arena::new(), None)
    }

    /// Static trees take only the depth bound from the settings; the slot
    /// count is whatever the caller provides.
    pub fn with_settings(settings: &Settings) -> Self {
        let mut tree = Self::new();
        tree.set_max_depth(settings.max_depth);
        tree
    }

    /// Hands a caller-built node to the tree. Any links it carries are
    /// dropped, the payload is kept. The slot lives until the tree is dropped
    /// or [`Tree::into_nodes`] returns it.
    #[instrument(level = "trace", skip(self, node))]
    pub fn provide(&mut self, mut node: TreeNode<T>) -> NodeId {
        let value = node.reset();
        node.value = value;
        let id = NodeId(self.arena.insert(node));
        trace!("Provided node {}", id);
        id
    }

    /// Provides `count` empty nodes.
    pub fn provide_empty(&mut self, count: usize) -> Vec<NodeId> {
        (0..count).map(|_| self.provide(TreeNode::new())).collect()
    }

    /// Returns the caller's nodes, links cleared, in the order provided.
    pub fn into_nodes(self) -> Vec<TreeNode<T>> {
        self.arena
            .into_iter()
            .map(|mut node| {
                let value = node.reset();
                node.value = value;
                node
            })
            .collect()
    }
}

#[cfg(feature = "dynamic")]
impl<T> Default for Tree<T, Dynamic> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "dynamic")]
impl<T> Tree<T, Dynamic> {
    /// Unbounded engine-allocated tree.
    pub fn new() -> Self {
        Self::with_arena(Arena::new(), None)
    }

    /// Engine-allocated tree holding at most `capacity` live nodes. Slots are
    /// reserved up front and [`Tree::create`] refuses to go past the bound.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_arena(Arena::with_capacity(capacity), Some(capacity))
    }

    pub fn with_settings(settings: &Settings) -> Self {
        let mut tree = match settings.capacity {
            Some(capacity) => Self::with_capacity(capacity),
            None => Self::new(),
        };
        tree.set_max_depth(settings.max_depth);
        tree
    }

    /// Allocates and initializes an empty node.
    ///
    /// Fails with [`TreeError::OutOfMemory`] once a bounded tree is full.
    #[instrument(level = "trace", skip(self))]
    pub fn create(&mut self) -> TreeResult<NodeId> {
        if let Some(capacity) = self.capacity {
            if self.arena.len() >= capacity {
                return Err(TreeError::OutOfMemory { capacity });
            }
        }
        let id = NodeId(self.arena.insert(TreeNode::new()));
        trace!("Created node {}", id);
        Ok(id)
    }

    /// [`Tree::create`] followed by [`Tree::set_value`].
    pub fn create_with(&mut self, value: T) -> TreeResult<NodeId> {
        let id = self.create()?;
        self.set_value(id, value)?;
        Ok(id)
    }

    /// Deletes the leaf referenced by `node` and releases its slot.
    ///
    /// On success `node` becomes `None` and the payload is returned. On
    /// failure the node and `node` are left as they were. An empty reference
    /// reports [`TreeError::NotFound`].
    #[instrument(level = "trace", skip(self))]
    pub fn destroy(&mut self, node: &mut Option<NodeId>) -> TreeResult<Option<T>> {
        let id = node.ok_or(TreeError::NotFound)?;
        let value = self.release(id)?;
        *node = None;
        Ok(value)
    }

    /// [`Tree::delete_subtree`] that also releases every slot. On success all
    /// handles of the subtree are dead and `root` is `None`.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy_subtree(&mut self, root: &mut Option<NodeId>) -> TreeResult<Vec<T>> {
        let id = root.ok_or(TreeError::NotFound)?;
        self.live("subtree root", id)?;
        self.check_depth(id)?;

        let payloads = self.teardown(root, |tree, id| tree.release(id))?;
        debug!("Destroyed subtree at {}: {} nodes left", id, self.len());
        Ok(payloads)
    }

    fn release(&mut self, id: NodeId) -> TreeResult<Option<T>> {
        let value = self.delete(id)?;
        self.arena.remove(id.0);
        trace!("Released node {}", id);
        Ok(value)
    }
}
