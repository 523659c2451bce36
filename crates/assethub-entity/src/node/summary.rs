//! Minimal projections of tree nodes.
//!
//! Search collaborators return [`AssetSummary`] values directly; cache
//! sourced nodes go through the same constructors so both paths produce
//! identical view items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use assethub_core::types::{NodeId, NodeType};

use super::kind::{AssetKind, ProcessingStatus};
use super::model::{NodeCounts, TreeNode};

/// Minimal asset record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSummary {
    /// Asset id.
    pub id: NodeId,
    /// Title.
    pub name: String,
    /// Asset subtype.
    pub kind: AssetKind,
    /// Parent bundle or asset.
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// Whether the asset may have children.
    #[serde(default)]
    pub is_container: bool,
    /// Child-creation status.
    #[serde(default)]
    pub processing_status: Option<ProcessingStatus>,
    /// Placeholder flag.
    #[serde(default)]
    pub stub: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Minimal bundle record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleSummary {
    /// Bundle id.
    pub id: NodeId,
    /// Bundle name.
    pub name: String,
    /// Parent bundle.
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// Aggregate counts.
    #[serde(default)]
    pub counts: NodeCounts,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Tagged projection of a tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeSummary {
    /// An asset.
    Asset(AssetSummary),
    /// A bundle.
    Bundle(BundleSummary),
}

impl AssetSummary {
    /// Project an asset node. Assets without a recorded kind are treated as
    /// generic files.
    pub fn from_node(node: &TreeNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind.unwrap_or(AssetKind::File),
            parent_id: node.parent_id.clone(),
            is_container: node.is_container,
            processing_status: node.processing_status,
            stub: node.stub,
            created_at: node.created_at,
            updated_at: node.updated_at,
        }
    }
}

impl BundleSummary {
    /// Project a bundle node.
    pub fn from_node(node: &TreeNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            parent_id: node.parent_id.clone(),
            counts: node.counts,
            created_at: node.created_at,
            updated_at: node.updated_at,
        }
    }
}

impl NodeSummary {
    /// Project any node according to its type.
    pub fn from_node(node: &TreeNode) -> Self {
        match node.node_type {
            NodeType::Asset => Self::Asset(AssetSummary::from_node(node)),
            NodeType::Bundle => Self::Bundle(BundleSummary::from_node(node)),
        }
    }

    /// The projected node's id.
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Asset(asset) => &asset.id,
            Self::Bundle(bundle) => &bundle.id,
        }
    }
}
