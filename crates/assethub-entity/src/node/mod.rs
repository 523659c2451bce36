//! Tree node entities.

pub mod kind;
pub mod model;
pub mod page;
pub mod summary;

pub use kind::{AssetKind, ProcessingStatus};
pub use model::{NodeCounts, TreeNode};
pub use page::{ChildrenPage, PageRequest};
pub use summary::{AssetSummary, BundleSummary, NodeSummary};
