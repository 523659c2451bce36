//! Immutable views of the tree cache.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use assethub_core::types::NodeId;
use assethub_entity::node::TreeNode;

/// One cached level: an ordered list of sibling nodes plus the version
/// assigned when it was stored.
#[derive(Debug, Clone)]
pub struct CachedLevel {
    /// Nodes in server order.
    pub nodes: Arc<Vec<TreeNode>>,
    /// Monotonic version; changes whenever the level is replaced or grows.
    pub version: u64,
    /// Size of the server-side list. Equals `nodes.len()` unless `has_more`.
    pub total: usize,
    /// Whether `nodes` is a prefix of a longer server-side list.
    pub has_more: bool,
}

/// Where a node hangs in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// The node is part of the top-level forest.
    Root,
    /// The node is a child of the given node.
    Node(NodeId),
}

/// Point-in-time copy of the cache handed to the view composer.
#[derive(Debug, Clone, Default)]
pub struct TreeSnapshot {
    /// Top-level forest, `None` until the first successful root load.
    pub roots: Option<CachedLevel>,
    /// Children entries keyed by parent id.
    pub children: HashMap<NodeId, CachedLevel>,
    /// Nodes with a children fetch in flight.
    pub pending: HashSet<NodeId>,
}

impl TreeSnapshot {
    /// Cached children of `id`, if fetched.
    pub fn children_of(&self, id: &NodeId) -> Option<&CachedLevel> {
        self.children.get(id)
    }

    /// Whether a children fetch for `id` is in flight.
    pub fn is_pending(&self, id: &NodeId) -> bool {
        self.pending.contains(id)
    }

    /// `id` plus every cached descendant, depth first.
    pub fn descendant_ids(&self, id: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![id.clone()];
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(level) = self.children.get(&current) {
                for child in level.nodes.iter().rev() {
                    stack.push(child.id.clone());
                }
            }
            out.push(current);
        }
        out
    }
}
