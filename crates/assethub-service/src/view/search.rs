//! Remote search overlay with semantic-to-lexical fallback.

use std::sync::Arc;

use tracing::{debug, info};

use assethub_core::config::search::{SearchConfig, SearchMode};
use assethub_core::error::ErrorKind;
use assethub_core::result::AppResult;
use assethub_entity::search::{RankedAsset, SearchFilters, SearchOutcome};

use crate::backend::SearchProvider;
use crate::context::WorkspaceContext;

/// Runs overlay queries against exactly one search collaborator.
#[derive(Debug, Clone)]
pub struct SearchOverlay {
    provider: Arc<dyn SearchProvider>,
    config: SearchConfig,
}

impl SearchOverlay {
    /// Create an overlay backed by `provider`.
    pub fn new(provider: Arc<dyn SearchProvider>, config: SearchConfig) -> Self {
        Self { provider, config }
    }

    /// Whether a query should replace the tree with ranked results.
    pub fn is_active(&self, query: &str) -> bool {
        self.config.remote_enabled && !query.trim().is_empty()
    }

    /// Run `query` in `requested` mode.
    ///
    /// Semantic mode is only used when the workspace has an embedding
    /// model; otherwise lexical search serves the query directly. When the
    /// semantic collaborator reports missing embeddings the query is
    /// re-run lexically and the outcome is flagged `fell_back`. Any other
    /// failure is returned.
    pub async fn run(
        &self,
        workspace: &WorkspaceContext,
        query: &str,
        requested: SearchMode,
        filters: &SearchFilters,
    ) -> AppResult<SearchOutcome> {
        let query = query.trim();
        let mut filters = filters.clone();
        if filters.limit.is_none() {
            filters.limit = Some(self.config.result_limit);
        }

        let semantic = requested == SearchMode::Semantic && workspace.semantic_enabled();
        if requested == SearchMode::Semantic && !semantic {
            debug!(
                workspace_id = workspace.id.0,
                "Semantic search requested without an embedding model; using lexical"
            );
        }

        if semantic {
            match self
                .provider
                .search_semantic(workspace.id, query, &filters)
                .await
            {
                Ok(results) => {
                    return Ok(self.outcome(query, requested, SearchMode::Semantic, false, results));
                }
                Err(e) if e.kind == ErrorKind::EmbeddingsUnavailable => {
                    info!(
                        workspace_id = workspace.id.0,
                        reason = %e.message,
                        "Semantic search unavailable, falling back to lexical"
                    );
                    let results = self
                        .provider
                        .search_lexical(workspace.id, query, &filters)
                        .await?;
                    return Ok(self.outcome(query, requested, SearchMode::Lexical, true, results));
                }
                Err(e) => return Err(e),
            }
        }

        let results = self
            .provider
            .search_lexical(workspace.id, query, &filters)
            .await?;
        Ok(self.outcome(query, requested, SearchMode::Lexical, false, results))
    }

    fn outcome(
        &self,
        query: &str,
        requested: SearchMode,
        served_by: SearchMode,
        fell_back: bool,
        mut results: Vec<RankedAsset>,
    ) -> SearchOutcome {
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(self.config.result_limit);
        SearchOutcome {
            query: query.to_string(),
            requested,
            served_by,
            fell_back,
            results,
        }
    }
}
