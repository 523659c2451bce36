//! # assethub-cache
//!
//! Client-side cache for the server-held asset tree:
//!
//! - **source**: the [`TreeSource`] collaborator the cache loads from
//! - **tree**: [`TreeCache`], roots plus a per-node children cache with
//!   deduplicated lazy loads and targeted invalidation
//! - **memo**: [`SortMemo`], memoized per-level sort orders keyed by the
//!   cache entry version
//!
//! The cache holds no selection or expansion state.

pub mod memo;
pub mod source;
pub mod tree;

pub use memo::{MemoKey, SortMemo};
pub use source::TreeSource;
pub use tree::{CachedLevel, ParentRef, TreeCache, TreeSnapshot};
