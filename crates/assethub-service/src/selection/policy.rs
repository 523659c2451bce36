//! Auto-selection policies applied when a node is added to the selection.

use assethub_cache::TreeCache;
use assethub_core::types::NodeId;
use assethub_entity::node::{AssetKind, TreeNode};

/// Decides which extra nodes join the selection alongside a newly
/// selected one.
pub trait CascadePolicy: Send + Sync + std::fmt::Debug + 'static {
    /// Ids to add together with `node`. Only cached data may be consulted;
    /// the policy must never trigger a fetch.
    fn companions(&self, node: &TreeNode, cache: &TreeCache) -> Vec<NodeId>;
}

/// Selecting a composite asset (article, web page, feed, email, mailbox)
/// also selects its cached image children.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageAttachmentPolicy;

impl CascadePolicy for ImageAttachmentPolicy {
    fn companions(&self, node: &TreeNode, cache: &TreeCache) -> Vec<NodeId> {
        if !node.kind.is_some_and(|kind| kind.is_composite()) {
            return Vec::new();
        }
        cache
            .cached_children(&node.id)
            .map(|children| {
                children
                    .iter()
                    .filter(|child| child.kind == Some(AssetKind::Image))
                    .map(|child| child.id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Never selects anything beyond the toggled node.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCascade;

impl CascadePolicy for NoCascade {
    fn companions(&self, _node: &TreeNode, _cache: &TreeCache) -> Vec<NodeId> {
        Vec::new()
    }
}
