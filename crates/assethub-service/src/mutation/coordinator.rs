//! Reparent, drop composition, and delete with targeted invalidation.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use assethub_cache::{ParentRef, TreeCache};
use assethub_core::config::explorer::ExplorerConfig;
use assethub_core::error::AppError;
use assethub_core::result::AppResult;
use assethub_core::types::{NodeId, WorkspaceId};

use super::report::{BatchMoveReport, CacheEffect, DropTarget};
use crate::backend::TreeMutator;

/// Sends mutations to the server and invalidates exactly the cache entries
/// they affect.
///
/// The coordinator only drops entries; re-fetching them (for nodes the UI
/// has expanded) is the caller's decision.
#[derive(Debug, Clone)]
pub struct MutationCoordinator {
    cache: TreeCache,
    mutator: Arc<dyn TreeMutator>,
    config: ExplorerConfig,
}

impl MutationCoordinator {
    /// Create a coordinator over `cache`.
    pub fn new(cache: TreeCache, mutator: Arc<dyn TreeMutator>, config: ExplorerConfig) -> Self {
        Self {
            cache,
            mutator,
            config,
        }
    }

    fn workspace(&self) -> AppResult<WorkspaceId> {
        self.cache
            .workspace()
            .ok_or_else(|| AppError::validation("No workspace selected"))
    }

    /// Drop the entry for `parent`, or flag the root forest.
    fn invalidate_parent(&self, parent: &ParentRef, effect: &mut CacheEffect) {
        match parent {
            ParentRef::Root => effect.root_changed = true,
            ParentRef::Node(id) => {
                self.cache.invalidate(id);
                if !effect.invalidated.contains(id) {
                    effect.invalidated.push(id.clone());
                }
            }
        }
    }

    /// Move one node under `new_parent` (`None` for the top level).
    ///
    /// On success the old and new parents' entries are invalidated, and so
    /// is the moved node's own entry when it is a bundle. Nothing else is
    /// touched. On failure the cache is left as it was.
    pub async fn move_node(&self, id: &NodeId, new_parent: Option<&NodeId>) -> AppResult<CacheEffect> {
        let workspace = self.workspace()?;
        if new_parent == Some(id) {
            return Err(AppError::validation(format!("Cannot move {id} into itself")));
        }

        let old_parent = self.cache.parent_of(id);
        self.mutator
            .move_node(workspace, id, new_parent)
            .await
            .map_err(|e| {
                warn!(node_id = %id, error = %e, "Move failed");
                e
            })?;

        let mut effect = CacheEffect::default();
        match &old_parent {
            Some(parent) => self.invalidate_parent(parent, &mut effect),
            None => debug!(node_id = %id, "Moved node was not cached; old parent unknown"),
        }
        let target = new_parent.map_or(ParentRef::Root, |p| ParentRef::Node(p.clone()));
        self.invalidate_parent(&target, &mut effect);

        if id.is_bundle() && self.cache.invalidate(id) {
            effect.invalidated.push(id.clone());
        }

        debug!(
            node_id = %id,
            invalidated = effect.invalidated.len(),
            root_changed = effect.root_changed,
            "Node moved"
        );
        Ok(effect)
    }

    /// Move every item under `target` concurrently.
    ///
    /// Individual failures are collected in the report rather than
    /// aborting the batch.
    pub async fn move_many(&self, items: &[NodeId], target: Option<&NodeId>) -> BatchMoveReport {
        let results = join_all(items.iter().map(|id| self.move_node(id, target))).await;

        let mut report = BatchMoveReport {
            target: target.cloned(),
            ..Default::default()
        };
        for (id, result) in items.iter().zip(results) {
            match result {
                Ok(effect) => {
                    report.moved.push(id.clone());
                    report.effect.merge(effect);
                }
                Err(e) => report.failed.push((id.clone(), e)),
            }
        }
        report
    }

    /// Drop `items` onto `target`.
    ///
    /// - top level or a bundle: the items are moved into it;
    /// - a plain asset: a new bundle is created beside it (in its parent
    ///   bundle, or at the top level) and both the target and the items
    ///   are moved into the new bundle;
    /// - a container asset: rejected with a validation error.
    ///
    /// Dropping a node onto itself is ignored. Fails before any move when
    /// the target is unknown or bundle creation fails.
    pub async fn drop_items(&self, items: &[NodeId], target: &DropTarget) -> AppResult<BatchMoveReport> {
        let target_id = match target {
            DropTarget::Root => return Ok(self.move_many(&dedup(items, None), None).await),
            DropTarget::Node(id) => id,
        };
        let items = dedup(items, Some(target_id));

        if target_id.is_bundle() {
            return Ok(self.move_many(&items, Some(target_id)).await);
        }

        let target_node = self
            .cache
            .find_node(target_id)
            .ok_or_else(|| AppError::not_found(format!("Drop target {target_id} is not loaded")))?;
        if target_node.is_container {
            return Err(AppError::validation(format!(
                "Cannot drop items into {target_id}"
            )));
        }

        let workspace = self.workspace()?;
        let parent = target_node.parent_id.filter(NodeId::is_bundle);
        let bundle = self
            .mutator
            .create_bundle(workspace, &self.config.new_bundle_name, parent.as_ref())
            .await?;
        info!(
            bundle_id = %bundle.id,
            target = %target_id,
            items = items.len(),
            "Created bundle for asset-on-asset drop"
        );

        let mut grouped = Vec::with_capacity(items.len() + 1);
        grouped.push(target_id.clone());
        grouped.extend(items);

        let mut report = self.move_many(&grouped, Some(&bundle.id)).await;
        let bundle_parent = parent.map_or(ParentRef::Root, ParentRef::Node);
        self.invalidate_parent(&bundle_parent, &mut report.effect);
        report.created_bundle = Some(bundle);
        Ok(report)
    }

    /// Delete nodes with their subtrees and invalidate their parents.
    pub async fn delete_nodes(&self, ids: &[NodeId]) -> AppResult<(Vec<NodeId>, CacheEffect)> {
        let workspace = self.workspace()?;
        let parents: Vec<Option<ParentRef>> = ids.iter().map(|id| self.cache.parent_of(id)).collect();

        let deleted = self.mutator.delete_nodes(workspace, ids).await.map_err(|e| {
            warn!(count = ids.len(), error = %e, "Delete failed");
            e
        })?;

        let mut effect = CacheEffect::default();
        for (id, parent) in ids.iter().zip(parents) {
            if !deleted.contains(id) {
                continue;
            }
            if let Some(parent) = parent {
                self.invalidate_parent(&parent, &mut effect);
            }
            self.cache.invalidate(id);
        }
        info!(count = deleted.len(), "Nodes deleted");
        Ok((deleted, effect))
    }
}

/// Drop duplicates and the target itself, keeping first-seen order.
fn dedup(items: &[NodeId], target: Option<&NodeId>) -> Vec<NodeId> {
    let mut out: Vec<NodeId> = Vec::with_capacity(items.len());
    for id in items {
        if Some(id) != target && !out.contains(id) {
            out.push(id.clone());
        }
    }
    out
}
