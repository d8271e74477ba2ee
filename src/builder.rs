//! Tree builder for level-order value sequences.

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::arena::Tree;
use crate::config::Settings;
use crate::errors::{TreeError, TreeResult};
use crate::node::{NodeId, Side, TreeNode};
#[cfg(feature = "dynamic")]
use crate::storage::Dynamic;
use crate::storage::{Static, StorageMode};

/// How a storage mode brings a fresh node into a tree.
pub trait Provision<T>: Sized {
    fn from_settings(settings: &Settings) -> Self;

    /// Adds one detached node holding `value`.
    fn provision(&mut self, value: Option<T>) -> TreeResult<NodeId>;
}

impl<T> Provision<T> for Tree<T, Static> {
    fn from_settings(settings: &Settings) -> Self {
        Self::with_settings(settings)
    }

    fn provision(&mut self, value: Option<T>) -> TreeResult<NodeId> {
        let node = value.map(TreeNode::with_value).unwrap_or_default();
        Ok(self.provide(node))
    }
}

#[cfg(feature = "dynamic")]
impl<T> Provision<T> for Tree<T, Dynamic> {
    fn from_settings(settings: &Settings) -> Self {
        Self::with_settings(settings)
    }

    fn provision(&mut self, value: Option<T>) -> TreeResult<NodeId> {
        let id = self.create()?;
        if let Some(value) = value {
            self.set_value(id, value)?;
        }
        Ok(id)
    }
}

/// Constructs binary trees from level-order sequences.
///
/// The sequence lists the root, then the children of each present node in
/// turn, left before right; `None` marks a missing child. Children of a
/// missing node are not listed. `[1, 2, 3, 4]` yields
///
/// ```text
///     1
///    / \
///   2   3
///  /
/// 4
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    settings: Settings,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }

    /// Builds a tree and returns it with its root handle; an empty sequence
    /// or a leading `None` yields an empty tree and no root.
    ///
    /// Fails with [`TreeError::InvalidArgument`] when values follow a missing
    /// root, and with [`TreeError::OutOfMemory`] when a bounded engine
    /// allocated tree runs full.
    #[instrument(level = "debug", skip(self, values))]
    pub fn build_from_level_order<T, M, I>(
        &self,
        values: I,
    ) -> TreeResult<(Tree<T, M>, Option<NodeId>)>
    where
        M: StorageMode,
        Tree<T, M>: Provision<T>,
        I: IntoIterator<Item = Option<T>>,
    {
        let mut tree = Tree::<T, M>::from_settings(&self.settings);
        let mut values = values.into_iter();

        let root = match values.next() {
            Some(Some(value)) => tree.provision(Some(value))?,
            Some(None) => {
                if values.any(|v| v.is_some()) {
                    return Err(TreeError::InvalidArgument(
                        "values listed below a missing root".to_string(),
                    ));
                }
                return Ok((tree, None));
            }
            None => return Ok((tree, None)),
        };

        let mut parents = VecDeque::from([root]);
        'levels: while let Some(parent) = parents.pop_front() {
            for side in [Side::Left, Side::Right] {
                let Some(value) = values.next() else {
                    break 'levels;
                };
                if let Some(value) = value {
                    let child = tree.provision(Some(value))?;
                    tree.append(parent, child, side)?;
                    parents.push_back(child);
                }
            }
        }

        if values.any(|v| v.is_some()) {
            return Err(TreeError::InvalidArgument(
                "values listed below missing nodes".to_string(),
            ));
        }

        debug!(
            "Built {} tree with {} nodes, depth {}",
            M::NAME,
            tree.len(),
            tree.depth(Some(root))
        );
        Ok((tree, Some(root)))
    }
}
