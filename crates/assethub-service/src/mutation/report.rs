//! Outcomes of mutations.

use serde::{Deserialize, Serialize};

use assethub_core::error::{AppError, ErrorKind};
use assethub_core::types::NodeId;
use assethub_entity::node::TreeNode;

/// Where dragged items are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DropTarget {
    /// The top level.
    Root,
    /// Onto a node: into it for bundles, next to it in a new bundle for
    /// plain assets.
    Node(NodeId),
}

impl DropTarget {
    /// Target from an optional node id.
    pub fn from_option(id: Option<NodeId>) -> Self {
        id.map_or(Self::Root, Self::Node)
    }
}

/// Cache entries a mutation made stale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEffect {
    /// Children entries that were dropped.
    pub invalidated: Vec<NodeId>,
    /// Whether the top-level forest changed.
    pub root_changed: bool,
}

impl CacheEffect {
    /// Fold another effect into this one.
    pub fn merge(&mut self, other: CacheEffect) {
        for id in other.invalidated {
            if !self.invalidated.contains(&id) {
                self.invalidated.push(id);
            }
        }
        self.root_changed |= other.root_changed;
    }
}

/// Aggregate outcome of a multi-item move.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchMoveReport {
    /// Items that now live under the target.
    pub moved: Vec<NodeId>,
    /// Items whose move failed, with the error.
    #[serde(skip)]
    pub failed: Vec<(NodeId, AppError)>,
    /// Bundle created to hold an asset-on-asset drop.
    pub created_bundle: Option<TreeNode>,
    /// Parent the items were moved under (`None` for the top level).
    pub target: Option<NodeId>,
    /// Cache maintenance applied.
    pub effect: CacheEffect,
}

impl BatchMoveReport {
    /// Whether every item moved.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Single error summarizing the failed items, if any.
    pub fn aggregate_error(&self) -> Option<AppError> {
        let (_, first) = self.failed.first()?;
        let kind = if self.failed.iter().all(|(_, e)| e.kind == first.kind) {
            first.kind
        } else {
            ErrorKind::Internal
        };
        let ids = self
            .failed
            .iter()
            .map(|(id, _)| id.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Some(AppError::new(
            kind,
            format!(
                "{} of {} moves failed ({ids}): {}",
                self.failed.len(),
                self.failed.len() + self.moved.len(),
                first.message
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_dedups_invalidations() {
        let mut effect = CacheEffect {
            invalidated: vec![NodeId::bundle(1)],
            root_changed: false,
        };
        effect.merge(CacheEffect {
            invalidated: vec![NodeId::bundle(1), NodeId::bundle(2)],
            root_changed: true,
        });
        assert_eq!(effect.invalidated, vec![NodeId::bundle(1), NodeId::bundle(2)]);
        assert!(effect.root_changed);
    }

    #[test]
    fn test_aggregate_error() {
        let mut report = BatchMoveReport {
            moved: vec![NodeId::asset(1)],
            ..Default::default()
        };
        assert!(report.aggregate_error().is_none());

        report
            .failed
            .push((NodeId::asset(2), AppError::network("timeout")));
        let err = report.aggregate_error().unwrap();
        assert_eq!(err.kind, ErrorKind::Network);
        assert!(err.message.starts_with("1 of 2 moves failed (asset-2)"));
    }
}
