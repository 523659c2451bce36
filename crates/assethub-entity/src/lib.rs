//! # assethub-entity
//!
//! Domain models for the AssetHub explorer. [`node::TreeNode`] is the
//! server-shaped record for one tree entry, [`search::RankedAsset`] is a
//! search hit, and [`view::ViewItem`] is the renderable tree the composer
//! produces. All models derive `Debug`, `Clone`, `Serialize`, `Deserialize`.

pub mod node;
pub mod search;
pub mod view;

pub use node::{
    AssetKind, ChildrenPage, NodeCounts, NodeSummary, PageRequest, ProcessingStatus, TreeNode,
};
pub use search::RankedAsset;
pub use view::{SelectionState, ViewItem};
