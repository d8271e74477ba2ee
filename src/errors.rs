use thiserror::Error;

use crate::node::{NodeId, Side};

#[derive(Error, Debug)]
pub enum TreeError {
    /// Nothing to operate on, e.g. tearing down an already empty slot.
    #[error("nothing to do: reference is empty")]
    NotFound,

    #[error("invalid pointer: {0}")]
    InvalidPointer(String),

    #[error("out of memory: arena capacity {capacity} exhausted")]
    OutOfMemory { capacity: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{side} slot of node {parent} is already occupied")]
    SlotOccupied { parent: NodeId, side: Side },

    #[error("node {0} still has children")]
    NotALeaf(NodeId),

    #[error("node {node} is already attached to {parent}")]
    AlreadyAttached { node: NodeId, parent: NodeId },

    #[error("attaching {0} would make it its own ancestor")]
    CycleDetected(NodeId),

    #[error("tree depth {depth} exceeds the supported maximum of {limit}")]
    DepthLimit { depth: usize, limit: usize },

    #[error("traversal aborted: {0}")]
    Aborted(String),

    /// Boxed to keep `TreeResult` small.
    #[error("configuration error: {0}")]
    Config(#[source] Box<config::ConfigError>),
}

impl From<config::ConfigError> for TreeError {
    fn from(err: config::ConfigError) -> Self {
        TreeError::Config(Box::new(err))
    }
}

impl TreeError {
    pub(crate) fn dead(what: &str, id: NodeId) -> Self {
        TreeError::InvalidPointer(format!("{} {} is not a live node", what, id))
    }
}

pub type TreeResult<T> = Result<T, TreeError>;
