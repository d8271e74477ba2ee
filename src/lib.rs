//! Intrusive binary tree over a generational arena.
//!
//! Nodes are slots in a [`Tree`]; links between them are [`NodeId`] handles.
//! A node owns its `left`/`right` children and knows its parent through a
//! non-owning back reference. Payloads are a type parameter and are handed
//! back to the caller whenever a node is deleted.
//!
//! Two storage modes share every structural operation:
//!
//! ```
//! use bintree::{Side, StaticTree, TreeNode};
//!
//! let mut tree = StaticTree::new();
//! let root = tree.provide(TreeNode::with_value(1));
//! let left = tree.provide(TreeNode::with_value(2));
//! tree.append(root, left, Side::Left)?;
//! assert_eq!(tree.depth(Some(root)), 2);
//!
//! // leaves only: the root still has a child
//! assert!(tree.delete(root).is_err());
//! assert_eq!(tree.delete(left)?, Some(2));
//! # Ok::<(), bintree::TreeError>(())
//! ```
//!
//! With the `dynamic` feature the engine allocates and releases nodes itself:
//!
//! ```
//! # #[cfg(feature = "dynamic")]
//! # {
//! use bintree::{DynamicTree, Order};
//!
//! let mut tree: DynamicTree<&str> = DynamicTree::with_capacity(8);
//! let root = tree.create_with("root")?;
//! let child = tree.create_with("child")?;
//! tree.append_mode(root, child, bintree::Side::RIGHT_MODE)?;
//! assert_eq!(tree.collect(Order::Post, Some(root))?, vec![Some(&"child"), Some(&"root")]);
//!
//! let mut handle = Some(root);
//! tree.destroy_subtree(&mut handle)?;
//! assert!(handle.is_none() && tree.is_empty());
//! # }
//! # Ok::<(), bintree::TreeError>(())
//! ```

pub mod arena;
pub mod builder;
#[cfg(feature = "dynamic")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod exitcode;
pub mod node;
pub mod storage;
pub mod traverse;
pub mod tree_traits;
pub mod util;

#[cfg(feature = "dynamic")]
pub use arena::DynamicTree;
pub use arena::{StaticTree, Tree, DEFAULT_MAX_DEPTH};
pub use builder::{Provision, TreeBuilder};
pub use config::Settings;
pub use errors::{TreeError, TreeResult};
pub use node::{NodeId, Side, TreeNode};
#[cfg(feature = "dynamic")]
pub use storage::Dynamic;
pub use storage::{Static, StorageMode};
pub use traverse::{Order, Visitor};
pub use tree_traits::TreeNodeConvert;
