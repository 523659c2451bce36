//! Full reload that keeps the user's expansion state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use assethub_cache::TreeCache;
use assethub_core::error::AppError;
use assethub_core::result::AppResult;
use assethub_core::types::NodeId;

/// Outcome of a refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    /// Expanded nodes whose children were re-fetched.
    pub restored: Vec<NodeId>,
    /// Expanded nodes that could not be re-fetched; they must be collapsed.
    pub dropped: Vec<NodeId>,
}

/// Reloads the root forest and every expanded node's children.
#[derive(Debug, Clone)]
pub struct Refresher {
    cache: TreeCache,
    batch_size: usize,
}

impl Refresher {
    /// Create a refresher fetching at most `batch_size` children lists at once.
    pub fn new(cache: TreeCache, batch_size: usize) -> Self {
        Self {
            cache,
            batch_size: batch_size.max(1),
        }
    }

    /// Re-fetch the roots and the children of every id in `expanded`.
    ///
    /// Everything is staged off to the side and committed in one step, so
    /// readers see either the old tree or the new one. If the root fetch
    /// fails nothing is committed and the error is returned. Individual
    /// children failures only drop that node from the new cache and are
    /// reported in `dropped`.
    pub async fn refresh(&self, expanded: &HashSet<NodeId>) -> AppResult<RefreshReport> {
        let roots = self.cache.fetch_root_uncached().await.map_err(|e| {
            warn!(error = %e, "Refresh aborted: root fetch failed");
            e
        })?;

        let mut targets: Vec<NodeId> = expanded.iter().cloned().collect();
        targets.sort();

        let limiter = Arc::new(Semaphore::new(self.batch_size));
        let tasks = targets.into_iter().map(|id| {
            let limiter = limiter.clone();
            let cache = self.cache.clone();
            async move {
                let result = match limiter.acquire().await {
                    Ok(_permit) => cache.fetch_children_uncached(&id).await,
                    Err(_) => Err(AppError::internal("Refresh limiter closed")),
                };
                (id, result)
            }
        });

        let mut staged = HashMap::new();
        let mut report = RefreshReport::default();
        for (id, result) in join_all(tasks).await {
            match result {
                Ok(children) => {
                    staged.insert(id.clone(), children);
                    report.restored.push(id);
                }
                Err(e) => {
                    warn!(node_id = %id, error = %e, "Dropping expanded node on refresh");
                    report.dropped.push(id);
                }
            }
        }

        self.cache.replace_all(roots, staged);
        info!(
            restored = report.restored.len(),
            dropped = report.dropped.len(),
            "Tree refreshed"
        );
        Ok(report)
    }
}
