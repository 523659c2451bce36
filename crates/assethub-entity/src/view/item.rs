//! View item: one row of the rendered asset tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use assethub_core::types::{NodeId, NodeType};

use crate::node::{AssetKind, NodeCounts, NodeSummary, ProcessingStatus, TreeNode};
use crate::search::RankedAsset;

/// Cascading selection state of a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionState {
    /// Nothing in the subtree is selected.
    #[default]
    None,
    /// Some but not all of the cached subtree is selected.
    Partial,
    /// The node and every cached descendant are selected.
    Full,
}

/// Ephemeral, recomputed node of the rendered tree.
///
/// `children` is `None` when the children are not known (collapsed or not
/// yet fetched) and `Some(vec![])` when the node is known to be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewItem {
    /// Node id.
    pub id: NodeId,
    /// Asset or bundle.
    pub node_type: NodeType,
    /// Display name.
    pub name: String,
    /// Asset subtype.
    pub kind: Option<AssetKind>,
    /// Minimal projection of the source record.
    pub summary: NodeSummary,
    /// Whether the node may have children.
    pub is_container: bool,
    /// Materialized children, see type docs.
    pub children: Option<Vec<ViewItem>>,
    /// Whether the node is in the expanded set.
    pub is_expanded: bool,
    /// Whether the node is in the selection set.
    pub is_selected: bool,
    /// Whether a children fetch for this node is in flight.
    pub is_loading: bool,
    /// Whether the cached children are a prefix of a longer list.
    #[serde(default)]
    pub has_more: bool,
    /// Size of the server-side children list, once a page is cached.
    #[serde(default)]
    pub total_children: Option<usize>,
    /// Cascading selection state.
    pub selection: SelectionState,
    /// Relevance score (search overlay only).
    pub score: Option<f32>,
    /// Nesting depth, 0 at the top level.
    pub depth: usize,
    /// Aggregate counts for badges.
    pub counts: NodeCounts,
    /// Child-creation status.
    pub processing_status: Option<ProcessingStatus>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl ViewItem {
    /// Project a cached node with no annotation applied.
    pub fn from_node(node: &TreeNode, depth: usize) -> Self {
        Self {
            id: node.id.clone(),
            node_type: node.node_type,
            name: node.name.clone(),
            kind: node.kind,
            summary: NodeSummary::from_node(node),
            is_container: node.is_container,
            children: None,
            is_expanded: false,
            is_selected: false,
            is_loading: false,
            has_more: false,
            total_children: None,
            selection: SelectionState::None,
            score: None,
            depth,
            counts: node.counts,
            processing_status: node.processing_status,
            updated_at: node.updated_at,
        }
    }

    /// Project a ranked search hit as a flat, top-level item.
    pub fn from_ranked(hit: &RankedAsset) -> Self {
        let asset = &hit.asset;
        Self {
            id: asset.id.clone(),
            node_type: NodeType::Asset,
            name: asset.name.clone(),
            kind: Some(asset.kind),
            summary: NodeSummary::Asset(asset.clone()),
            is_container: asset.is_container,
            children: None,
            is_expanded: false,
            is_selected: false,
            is_loading: false,
            has_more: false,
            total_children: None,
            selection: SelectionState::None,
            score: Some(hit.score),
            depth: 0,
            counts: NodeCounts::default(),
            processing_status: asset.processing_status,
            updated_at: asset.updated_at,
        }
    }

    /// Ids of this item and every materialized descendant, depth first.
    pub fn visible_ids(&self, out: &mut Vec<NodeId>) {
        out.push(self.id.clone());
        if let Some(children) = &self.children {
            for child in children {
                child.visible_ids(out);
            }
        }
    }
}
