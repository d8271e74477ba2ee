//! Recursive depth-first walks.
//!
//! A walk hands every payload of the subtree to a visitor together with a
//! caller context that is passed through untouched. Visitors see payloads
//! only, never nodes or links.
//!
//! Contract shared by all three orders:
//! - a `None`/dead root or a `None` visitor fails with
//!   [`TreeError::InvalidPointer`] before anything is visited
//! - a subtree deeper than [`Tree::max_depth`] fails with
//!   [`TreeError::DepthLimit`] before anything is visited
//! - recursion depth equals tree depth; [`crate::DEFAULT_MAX_DEPTH`] is sized
//!   to fit a 2 MiB thread stack
//! - the first `Err` returned by the visitor stops the walk and is returned
//!   unchanged

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::arena::Tree;
use crate::errors::{TreeError, TreeResult};
use crate::node::NodeId;
use crate::storage::StorageMode;

/// Callback invoked once per node with the context and the node's payload.
/// `'t` is the borrow of the tree, so visitors may keep payload references.
pub type Visitor<'v, 't, C, T> = dyn FnMut(&mut C, Option<&'t T>) -> TreeResult<()> + 'v;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// visit, left, right
    Pre,
    /// left, visit, right
    In,
    /// left, right, visit
    Post,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Pre => write!(f, "pre"),
            Order::In => write!(f, "in"),
            Order::Post => write!(f, "post"),
        }
    }
}

impl FromStr for Order {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pre" | "preorder" | "pre-order" => Ok(Order::Pre),
            "in" | "inorder" | "in-order" => Ok(Order::In),
            "post" | "postorder" | "post-order" => Ok(Order::Post),
            other => Err(TreeError::InvalidArgument(format!(
                "unknown traversal order '{}'",
                other
            ))),
        }
    }
}

impl<T, M: StorageMode> Tree<T, M> {
    /// Walks `root` in the given order.
    pub fn walk<'t, C>(
        &'t self,
        order: Order,
        root: Option<NodeId>,
        ctx: &mut C,
        visitor: Option<&mut Visitor<'_, 't, C, T>>,
    ) -> TreeResult<()> {
        match order {
            Order::Pre => self.pre_order(root, ctx, visitor),
            Order::In => self.in_order(root, ctx, visitor),
            Order::Post => self.post_order(root, ctx, visitor),
        }
    }

    #[instrument(level = "trace", skip(self, ctx, visitor))]
    pub fn pre_order<'t, C>(
        &'t self,
        root: Option<NodeId>,
        ctx: &mut C,
        visitor: Option<&mut Visitor<'_, 't, C, T>>,
    ) -> TreeResult<()> {
        let (root, visitor) = self.prepare(root, visitor)?;
        self.pre_order_at(Some(root), ctx, visitor)
    }

    #[instrument(level = "trace", skip(self, ctx, visitor))]
    pub fn in_order<'t, C>(
        &'t self,
        root: Option<NodeId>,
        ctx: &mut C,
        visitor: Option<&mut Visitor<'_, 't, C, T>>,
    ) -> TreeResult<()> {
        let (root, visitor) = self.prepare(root, visitor)?;
        self.in_order_at(Some(root), ctx, visitor)
    }

    #[instrument(level = "trace", skip(self, ctx, visitor))]
    pub fn post_order<'t, C>(
        &'t self,
        root: Option<NodeId>,
        ctx: &mut C,
        visitor: Option<&mut Visitor<'_, 't, C, T>>,
    ) -> TreeResult<()> {
        let (root, visitor) = self.prepare(root, visitor)?;
        self.post_order_at(Some(root), ctx, visitor)
    }

    fn prepare<'a, 'v, 't, C>(
        &self,
        root: Option<NodeId>,
        visitor: Option<&'a mut Visitor<'v, 't, C, T>>,
    ) -> TreeResult<(NodeId, &'a mut Visitor<'v, 't, C, T>)>
    where
        T: 't,
    {
        let root = root.ok_or_else(|| TreeError::InvalidPointer("no root to walk".into()))?;
        if !self.contains(root) {
            return Err(TreeError::dead("walk root", root));
        }
        let visitor =
            visitor.ok_or_else(|| TreeError::InvalidPointer("no visitor given".into()))?;
        self.check_depth(root)?;
        Ok((root, visitor))
    }

    fn pre_order_at<'t, C>(
        &'t self,
        id: Option<NodeId>,
        ctx: &mut C,
        visitor: &mut Visitor<'_, 't, C, T>,
    ) -> TreeResult<()> {
        let Some(node) = id.and_then(|id| self.node(id)) else {
            return Ok(());
        };
        visitor(ctx, node.value())?;
        self.pre_order_at(node.left(), ctx, visitor)?;
        self.pre_order_at(node.right(), ctx, visitor)
    }

    fn in_order_at<'t, C>(
        &'t self,
        id: Option<NodeId>,
        ctx: &mut C,
        visitor: &mut Visitor<'_, 't, C, T>,
    ) -> TreeResult<()> {
        let Some(node) = id.and_then(|id| self.node(id)) else {
            return Ok(());
        };
        self.in_order_at(node.left(), ctx, visitor)?;
        visitor(ctx, node.value())?;
        self.in_order_at(node.right(), ctx, visitor)
    }

    fn post_order_at<'t, C>(
        &'t self,
        id: Option<NodeId>,
        ctx: &mut C,
        visitor: &mut Visitor<'_, 't, C, T>,
    ) -> TreeResult<()> {
        let Some(node) = id.and_then(|id| self.node(id)) else {
            return Ok(());
        };
        self.post_order_at(node.left(), ctx, visitor)?;
        self.post_order_at(node.right(), ctx, visitor)?;
        visitor(ctx, node.value())
    }

    /// Payloads of the subtree at `root` in the given order, `None` for
    /// empty nodes.
    pub fn collect<'t>(
        &'t self,
        order: Order,
        root: Option<NodeId>,
    ) -> TreeResult<Vec<Option<&'t T>>> {
        let mut out = Vec::new();
        let mut push = |out: &mut Vec<Option<&'t T>>, value: Option<&'t T>| -> TreeResult<()> {
            out.push(value);
            Ok(())
        };
        self.walk(order, root, &mut out, Some(&mut push))?;
        Ok(out)
    }
}
