//! Storage provisioning strategies.
//!
//! A [`Tree`](crate::Tree) is parameterized by one of these markers. Both share
//! every structural operation; the marker only decides how node slots come into
//! existence and whether the engine may ever release them:
//!
//! - [`Static`]: the caller provides nodes (`Tree::provide`) and gets them back
//!   (`Tree::into_nodes`). Slots are never released by the engine.
//! - [`Dynamic`]: the engine allocates (`Tree::create`) and releases
//!   (`Tree::destroy`, `Tree::destroy_subtree`) slots itself. Behind the
//!   `dynamic` cargo feature.

mod sealed {
    pub trait Sealed {}
}

pub trait StorageMode: sealed::Sealed {
    /// Human readable mode name, used in logs.
    const NAME: &'static str;
}

/// Caller-provided storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Static {}

impl sealed::Sealed for Static {}

impl StorageMode for Static {
    const NAME: &'static str = "static";
}

/// Engine-allocated storage.
#[cfg(feature = "dynamic")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dynamic {}

#[cfg(feature = "dynamic")]
impl sealed::Sealed for Dynamic {}

#[cfg(feature = "dynamic")]
impl StorageMode for Dynamic {
    const NAME: &'static str = "dynamic";
}
