//! Tree node model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use assethub_core::types::{NodeId, NodeType};

use super::kind::{AssetKind, ProcessingStatus};

/// Cached aggregate counts used for badges without loading children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCounts {
    /// Number of assets directly inside a bundle.
    #[serde(default)]
    pub asset_count: u64,
    /// Number of nested bundles directly inside a bundle.
    #[serde(default)]
    pub child_bundle_count: u64,
}

impl NodeCounts {
    /// Total number of direct children.
    pub fn total(&self) -> u64 {
        self.asset_count + self.child_bundle_count
    }
}

/// Server-shaped snapshot of one tree entry.
///
/// A node never embeds its children; those live in the tree cache keyed by
/// the node's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Namespaced id (`asset-<n>` / `bundle-<n>`).
    pub id: NodeId,
    /// Asset or bundle.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Display name.
    pub name: String,
    /// Asset subtype; `None` for bundles.
    #[serde(default)]
    pub kind: Option<AssetKind>,
    /// Parent bundle (or parent asset for pages, rows, ...).
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// Whether the node may have children, loaded or not.
    #[serde(default)]
    pub is_container: bool,
    /// Aggregate counts.
    #[serde(default)]
    pub counts: NodeCounts,
    /// Child-creation status for container assets.
    #[serde(default)]
    pub processing_status: Option<ProcessingStatus>,
    /// Placeholder asset whose content has not been fetched yet.
    #[serde(default)]
    pub stub: bool,
    /// When the node was created.
    pub created_at: DateTime<Utc>,
    /// When the node was last updated.
    pub updated_at: DateTime<Utc>,
}

impl TreeNode {
    /// A bundle with no counts, timestamped now.
    pub fn bundle(id: i64, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: NodeId::bundle(id),
            node_type: NodeType::Bundle,
            name: name.into(),
            kind: None,
            parent_id: None,
            is_container: true,
            counts: NodeCounts::default(),
            processing_status: None,
            stub: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// A leaf asset of the given kind, timestamped now.
    pub fn asset(id: i64, name: impl Into<String>, kind: AssetKind) -> Self {
        let now = Utc::now();
        Self {
            id: NodeId::asset(id),
            node_type: NodeType::Asset,
            name: name.into(),
            kind: Some(kind),
            parent_id: None,
            is_container: false,
            counts: NodeCounts::default(),
            processing_status: Some(ProcessingStatus::Ready),
            stub: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the parent reference.
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    /// Mark an asset as a container (multi-page document, feed, ...).
    pub fn as_container(mut self) -> Self {
        self.is_container = true;
        self
    }

    /// Set the update timestamp.
    pub fn updated(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = at;
        self
    }

    /// Whether this node is a bundle.
    pub fn is_bundle(&self) -> bool {
        self.node_type == NodeType::Bundle
    }

    /// Number of direct children according to the cached counts.
    pub fn children_count(&self) -> u64 {
        self.counts.total()
    }

    /// Whether the server reports children for this node.
    ///
    /// Bundles report children through their counts; container assets are
    /// assumed to have children until a fetch says otherwise.
    pub fn has_children(&self) -> bool {
        match self.node_type {
            NodeType::Bundle => self.counts.total() > 0,
            NodeType::Asset => self.is_container,
        }
    }
}
