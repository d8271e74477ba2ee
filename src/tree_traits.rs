use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::arena::Tree as BinaryTree;
use crate::errors::TreeResult;
use crate::node::NodeId;
use crate::storage::StorageMode;

/// Rendering of a binary tree as a `termtree` for terminal output.
pub trait TreeNodeConvert {
    /// Renders the subtree at `root`. Nodes without payload and single
    /// missing children show as `empty_label`, so left and right stay
    /// distinguishable. A dead or absent root renders as "Empty tree".
    ///
    /// Fails with [`crate::TreeError::DepthLimit`] for subtrees deeper than
    /// the tree's `max_depth`.
    fn to_tree_string(
        &self,
        root: Option<NodeId>,
        empty_label: &str,
    ) -> TreeResult<Tree<String>>;

    /// [`TreeNodeConvert::to_tree_string`] formatted to text.
    fn render(&self, root: Option<NodeId>, empty_label: &str) -> TreeResult<String> {
        let tree = self.to_tree_string(root, empty_label)?;
        let text = tree.to_string();
        dismantle(tree);
        Ok(text)
    }
}

/// Drops a termtree level by level; the derived drop recurses once per level.
pub fn dismantle<D: Display>(tree: Tree<D>) {
    let mut pending = vec![tree];
    while let Some(mut tree) = pending.pop() {
        pending.append(&mut tree.leaves);
    }
}

impl<T: Display, M: StorageMode> TreeNodeConvert for BinaryTree<T, M> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(
        &self,
        root: Option<NodeId>,
        empty_label: &str,
    ) -> TreeResult<Tree<String>> {
        let Some(root) = root.filter(|id| self.contains(*id)) else {
            return Ok(Tree::new("Empty tree".to_string()));
        };
        self.check_depth(root)?;

        let label = |id: NodeId| {
            self.value(id)
                .map(|v| v.to_string())
                .unwrap_or_else(|| empty_label.to_string())
        };

        // children come out of post_order_ids before their parent, so their
        // rendered subtrees are on top of `built` when the parent is reached
        let mut built: Vec<Tree<String>> = Vec::new();
        for id in self.post_order_ids(root) {
            let mut node_tree = Tree::new(label(id));
            let (left, right) = (self.left(id), self.right(id));
            if left.is_some() || right.is_some() {
                let right_tree = match right {
                    Some(_) => built.pop(),
                    None => Some(Tree::new(empty_label.to_string())),
                };
                let left_tree = match left {
                    Some(_) => built.pop(),
                    None => Some(Tree::new(empty_label.to_string())),
                };
                node_tree.leaves.extend(left_tree);
                node_tree.leaves.extend(right_tree);
            }
            built.push(node_tree);
        }

        Ok(built
            .pop()
            .unwrap_or_else(|| Tree::new("Empty tree".to_string())))
    }
}
