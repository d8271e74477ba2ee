//! Node representation: handles, slots and the per-node link record.

use std::fmt;
use std::str::FromStr;

use generational_arena::Index;

use crate::errors::{TreeError, TreeResult};

/// Handle of a node inside a [`Tree`](crate::Tree).
///
/// Wraps a generational arena index: once the slot behind it is released the
/// handle is dead and every lookup through it fails instead of aliasing
/// whatever node reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}v{}", slot, generation)
    }
}

/// Child slot selector for [`Tree::append`](crate::Tree::append).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Raw mode value selecting the left child slot.
    pub const LEFT_MODE: u8 = 0x01;
    /// Raw mode value selecting the right child slot.
    pub const RIGHT_MODE: u8 = 0x00;

    /// Decodes a raw mode value. Anything but the two recognized values is
    /// rejected, there is no "pick a free slot" mode.
    pub fn from_mode(mode: u8) -> TreeResult<Self> {
        match mode {
            Self::LEFT_MODE => Ok(Side::Left),
            Self::RIGHT_MODE => Ok(Side::Right),
            other => Err(TreeError::InvalidArgument(format!(
                "unknown append mode {:#04x}",
                other
            ))),
        }
    }

    pub fn mode(self) -> u8 {
        match self {
            Side::Left => Self::LEFT_MODE,
            Side::Right => Self::RIGHT_MODE,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Side {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Side::Left),
            "right" | "r" => Ok(Side::Right),
            other => Err(TreeError::InvalidArgument(format!(
                "unknown side '{}', expected left or right",
                other
            ))),
        }
    }
}

/// Link record of one tree node.
///
/// `parent` is a back reference only: ownership flows downwards through
/// `left`/`right`. A fresh or reset node has no links and no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode<T> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) value: Option<T>,
}

impl<T> Default for TreeNode<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeNode<T> {
    /// Creates an empty node.
    pub fn new() -> Self {
        Self {
            parent: None,
            left: None,
            right: None,
            value: None,
        }
    }

    /// Creates an empty node already carrying a payload.
    pub fn with_value(value: T) -> Self {
        Self {
            value: Some(value),
            ..Self::new()
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// True when the node has no links and no payload.
    pub fn is_empty(&self) -> bool {
        self.is_leaf() && self.parent.is_none() && self.value.is_none()
    }

    pub(crate) fn slot_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Drops all links and hands the payload back.
    pub(crate) fn reset(&mut self) -> Option<T> {
        self.parent = None;
        self.left = None;
        self.right = None;
        self.value.take()
    }
}
