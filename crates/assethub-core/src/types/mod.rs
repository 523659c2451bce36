//! Core type definitions used across the AssetHub workspace.

pub mod id;
pub mod sorting;

pub use id::{NodeId, NodeType, WorkspaceId};
pub use sorting::{SortDirection, SortField, SortKey, SortOption};
