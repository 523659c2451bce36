//! The asset explorer facade.
//!
//! Owns the tree cache, the selection, and the UI state (expansion, sort,
//! filters, search) and exposes the operations a tree UI needs. Read
//! operations never fail: their errors are published on the event bus.
//! Mutations return their errors to the caller.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use assethub_cache::{SortMemo, TreeCache, TreeSource};
use assethub_core::config::AppConfig;
use assethub_core::config::search::SearchMode;
use assethub_core::events::{EventPayload, ExplorerEvent};
use assethub_core::result::AppResult;
use assethub_core::types::{NodeId, SortOption};
use assethub_entity::search::{SearchFilters, SearchOutcome};
use assethub_entity::view::ViewItem;

use crate::backend::{SearchProvider, TreeMutator};
use crate::context::WorkspaceContext;
use crate::events::EventBus;
use crate::mutation::{BatchMoveReport, CacheEffect, DropTarget, MutationCoordinator, RefreshReport, Refresher};
use crate::selection::{CascadePolicy, SelectionEngine, ToggleOutcome};
use crate::view::{SearchOverlay, SearchView, TypeFilter, ViewComposer, ViewInput};

/// UI state that shapes the view.
#[derive(Debug, Default)]
struct ViewState {
    workspace: Option<WorkspaceContext>,
    expanded: HashSet<NodeId>,
    sort: SortOption,
    type_filter: TypeFilter,
    search_term: String,
    search_mode: SearchMode,
    outcome: Option<SearchOutcome>,
    scope: Option<NodeId>,
}

/// Client-side explorer over a server-held asset tree.
#[derive(Debug)]
pub struct AssetExplorer {
    cache: TreeCache,
    selection: RwLock<SelectionEngine>,
    state: RwLock<ViewState>,
    composer: ViewComposer,
    overlay: SearchOverlay,
    mutations: MutationCoordinator,
    refresher: Refresher,
    events: EventBus,
    config: AppConfig,
    /// Bumped on every search-affecting change; stale responses are dropped.
    search_generation: AtomicU64,
}

impl AssetExplorer {
    /// Create an explorer with the default cascade policy.
    pub fn new(
        config: &AppConfig,
        source: Arc<dyn TreeSource>,
        mutator: Arc<dyn TreeMutator>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        let cache = TreeCache::with_page_size(source, config.cache.children_page_size);
        Self {
            selection: RwLock::new(SelectionEngine::new(cache.clone())),
            state: RwLock::new(ViewState {
                search_mode: config.search.default_mode,
                ..ViewState::default()
            }),
            composer: ViewComposer::new(SortMemo::new(&config.cache)),
            overlay: SearchOverlay::new(search, config.search.clone()),
            mutations: MutationCoordinator::new(cache.clone(), mutator, config.explorer.clone()),
            refresher: Refresher::new(cache.clone(), config.explorer.refresh_batch_size),
            events: EventBus::new(config.explorer.event_buffer),
            config: config.clone(),
            search_generation: AtomicU64::new(0),
            cache,
        }
    }

    /// Replace the cascade policy. Clears the selection.
    pub fn with_cascade_policy(self, policy: Arc<dyn CascadePolicy>) -> Self {
        let selection = SelectionEngine::with_policy(self.cache.clone(), policy);
        Self {
            selection: RwLock::new(selection),
            ..self
        }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &TreeCache {
        &self.cache
    }

    /// Subscribe to explorer events.
    pub fn subscribe(&self) -> broadcast::Receiver<ExplorerEvent> {
        self.events.subscribe()
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Bind to a workspace: discard all state and load the root forest.
    pub async fn init(&self, workspace: WorkspaceContext) {
        info!(workspace_id = workspace.id.0, "Initializing explorer");
        self.clear_state(Some(workspace.clone())).await;
        self.cache.init(workspace.id);
        self.reload_root().await;
    }

    /// Discard all state and unbind from the workspace.
    pub async fn reset(&self) {
        self.clear_state(None).await;
        self.cache.reset();
        debug!("Explorer reset");
    }

    async fn clear_state(&self, workspace: Option<WorkspaceContext>) {
        self.search_generation.fetch_add(1, Ordering::SeqCst);
        self.selection.write().await.clear();
        let mut state = self.state.write().await;
        *state = ViewState {
            workspace,
            search_mode: state.search_mode,
            sort: state.sort,
            ..ViewState::default()
        };
        self.composer.clear_memo();
    }

    async fn reload_root(&self) {
        if let Err(e) = self.cache.fetch_root().await {
            warn!(error = %e, "Root load failed");
            self.events.load_failed(None, &e);
        }
    }

    // ── Reads ───────────────────────────────────────────────────

    /// Compose the current view.
    pub async fn view(&self) -> Vec<ViewItem> {
        let snapshot = self.cache.snapshot();
        let selection = self.selection.read().await;
        let state = self.state.read().await;

        let search = if self.overlay.is_active(&state.search_term) {
            SearchView::Overlay(state.outcome.as_ref())
        } else {
            SearchView::Filter(&state.search_term)
        };
        let input = ViewInput {
            snapshot: &snapshot,
            expanded: &state.expanded,
            selected: selection.as_set(),
            sort: state.sort,
            type_filter: &state.type_filter,
            search,
            scope: state.scope.as_ref(),
        };
        self.composer.compose(&input)
    }

    /// Ids of every item currently in the view, depth first.
    pub async fn visible_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        for item in self.view().await {
            item.visible_ids(&mut ids);
        }
        ids
    }

    /// Immutable copy of the selection.
    pub async fn selected_ids(&self) -> HashSet<NodeId> {
        self.selection.read().await.selected()
    }

    /// Immutable copy of the expanded set.
    pub async fn expanded_ids(&self) -> HashSet<NodeId> {
        self.state.read().await.expanded.clone()
    }

    /// Latest overlay result, if a remote query is active.
    pub async fn search_outcome(&self) -> Option<SearchOutcome> {
        self.state.read().await.outcome.clone()
    }

    /// Whether `id` and every cached descendant are selected.
    pub async fn is_bundle_fully_selected(&self, id: &NodeId) -> bool {
        self.selection.read().await.is_bundle_fully_selected(id)
    }

    /// Whether some, but not all, of `id`'s cached subtree is selected.
    pub async fn is_bundle_partially_selected(&self, id: &NodeId) -> bool {
        self.selection.read().await.is_bundle_partially_selected(id)
    }

    // ── Expansion ───────────────────────────────────────────────

    /// Expand or collapse `id`. Returns whether it is expanded afterwards.
    ///
    /// Expanding fetches the children unless cached; on failure the node
    /// collapses again and a `LoadFailed` event is published. Collapsing
    /// is immediate.
    pub async fn toggle_expand(&self, id: &NodeId) -> bool {
        {
            let mut state = self.state.write().await;
            if state.expanded.remove(id) {
                return false;
            }
            state.expanded.insert(id.clone());
        }

        match self.cache.fetch_children(id).await {
            Ok(_) => self.state.read().await.expanded.contains(id),
            Err(e) => {
                self.state.write().await.expanded.remove(id);
                self.events.load_failed(Some(id.clone()), &e);
                false
            }
        }
    }

    /// Load the next page of an expanded node's children.
    ///
    /// Returns whether the node has children left to load afterwards. A
    /// failure publishes `LoadFailed` and keeps the pages already cached.
    pub async fn load_more(&self, id: &NodeId) -> bool {
        match self.cache.load_more(id).await {
            Ok(_) => self.cache.has_more(id),
            Err(e) => {
                warn!(node_id = %id, error = %e, "Loading more children failed");
                self.events.load_failed(Some(id.clone()), &e);
                self.cache.has_more(id)
            }
        }
    }

    /// Show only the cached children of `scope` (or the roots for `None`).
    pub async fn set_scope(&self, scope: Option<NodeId>) {
        if let Some(id) = &scope {
            if let Err(e) = self.cache.fetch_children(id).await {
                self.events.load_failed(Some(id.clone()), &e);
            }
        }
        self.state.write().await.scope = scope;
    }

    // ── Selection ───────────────────────────────────────────────

    /// Toggle the selection of `id`; see [`SelectionEngine::toggle`].
    pub async fn toggle_select(&self, id: &NodeId, multi_select: bool) -> ToggleOutcome {
        let outcome = self.selection.write().await.toggle(id, multi_select);
        if outcome.auto_added > 0 {
            self.events.publish(EventPayload::AutoSelected {
                parent_id: id.clone(),
                added: outcome.auto_added,
            });
        }
        outcome
    }

    /// Select exactly the items currently in the view.
    pub async fn select_all_visible(&self) {
        let ids = self.visible_ids().await;
        self.selection.write().await.select_all_visible(ids);
    }

    /// Empty the selection.
    pub async fn clear_selection(&self) {
        self.selection.write().await.clear();
    }

    /// Select or deselect `id` with its cached descendants.
    pub async fn toggle_bundle_cascade(&self, id: &NodeId, select: bool) -> usize {
        self.selection.write().await.toggle_bundle_cascade(id, select)
    }

    // ── View options ────────────────────────────────────────────

    /// Change the per-level ordering.
    pub async fn set_sort_option(&self, sort: SortOption) {
        self.state.write().await.sort = sort;
    }

    /// Change the kind filter. An active overlay is re-queried so the
    /// collaborator can apply the filter server-side.
    pub async fn set_type_filter(&self, filter: TypeFilter) {
        self.state.write().await.type_filter = filter;
        self.requery().await;
    }

    /// Change the search term.
    ///
    /// A blank term (or remote search disabled) only drives the local
    /// filter. Otherwise the overlay query is sent after the configured
    /// debounce; a newer call supersedes it before or after sending.
    /// Returns the outcome if this call's results were applied.
    pub async fn set_search_query(&self, query: &str) -> Option<SearchOutcome> {
        {
            let mut state = self.state.write().await;
            state.search_term = query.to_string();
            state.outcome = None;
        }
        self.run_search().await
    }

    /// Change the search mode and re-run the active query.
    pub async fn set_search_mode(&self, mode: SearchMode) -> Option<SearchOutcome> {
        {
            let mut state = self.state.write().await;
            if state.search_mode == mode {
                return state.outcome.clone();
            }
            state.search_mode = mode;
        }
        self.run_search().await
    }

    async fn requery(&self) {
        let active = {
            let state = self.state.read().await;
            self.overlay.is_active(&state.search_term)
        };
        if active {
            self.run_search().await;
        }
    }

    async fn run_search(&self) -> Option<SearchOutcome> {
        let generation = self.search_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (query, mode, workspace, filters) = {
            let state = self.state.read().await;
            if !self.overlay.is_active(&state.search_term) {
                return None;
            }
            let workspace = state.workspace.clone()?;
            let filters = SearchFilters {
                kinds: state.type_filter.kinds(),
                limit: Some(self.config.search.result_limit),
            };
            (state.search_term.clone(), state.search_mode, workspace, filters)
        };

        if self.config.search.debounce_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.search.debounce_ms)).await;
            if self.is_stale(generation) {
                debug!(query = %query, "Search superseded before sending");
                return None;
            }
        }

        let result = self.overlay.run(&workspace, &query, mode, &filters).await;
        if self.is_stale(generation) {
            debug!(query = %query, "Discarding stale search results");
            return None;
        }

        match result {
            Ok(outcome) => {
                if outcome.fell_back {
                    self.events.publish(EventPayload::SearchFallback {
                        query: outcome.query.clone(),
                        requested: outcome.requested,
                        served_by: outcome.served_by,
                        reason: "Embeddings are not available for this workspace".to_string(),
                    });
                }
                self.state.write().await.outcome = Some(outcome.clone());
                Some(outcome)
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Search failed");
                self.events.publish(EventPayload::SearchFailed {
                    query,
                    kind: e.kind,
                    message: e.message.clone(),
                });
                None
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.search_generation.load(Ordering::SeqCst) != generation
    }

    // ── Refresh & mutations ─────────────────────────────────────

    /// Reload the tree, keeping every expanded node whose children can
    /// still be fetched. A failed root fetch leaves the current tree in
    /// place and is returned.
    pub async fn refresh(&self) -> AppResult<RefreshReport> {
        let expanded = self.expanded_ids().await;
        let report = match self.refresher.refresh(&expanded).await {
            Ok(report) => report,
            Err(e) => {
                self.events.load_failed(None, &e);
                return Err(e);
            }
        };

        {
            let mut state = self.state.write().await;
            for id in &report.dropped {
                state.expanded.remove(id);
            }
        }
        self.restore_uncached().await;
        self.events.publish(EventPayload::RefreshCompleted {
            restored: report.restored.len(),
            dropped: report.dropped.clone(),
        });
        self.requery().await;
        Ok(report)
    }

    /// Fetch children for every expanded node (and the scope) the cache no
    /// longer holds. Nodes expanded while a refresh was staging lose their
    /// entry on commit and are reloaded here.
    async fn restore_uncached(&self) {
        let missing: Vec<NodeId> = {
            let state = self.state.read().await;
            let mut missing: Vec<NodeId> = state
                .expanded
                .iter()
                .chain(state.scope.as_ref())
                .filter(|id| !self.cache.is_cached(id))
                .cloned()
                .collect();
            missing.sort();
            missing.dedup();
            missing
        };
        if missing.is_empty() {
            return;
        }

        debug!(count = missing.len(), "Reloading nodes expanded during refresh");
        let results = join_all(missing.iter().map(|id| self.cache.fetch_children(id))).await;

        let mut state = self.state.write().await;
        for (id, result) in missing.iter().zip(results) {
            if let Err(e) = result {
                state.expanded.remove(id);
                self.events.load_failed(Some(id.clone()), &e);
            }
        }
    }

    /// Move the selection under `target` (`None` for the top level).
    /// The selection is cleared when every item moved.
    pub async fn move_selection_to(&self, target: Option<NodeId>) -> AppResult<BatchMoveReport> {
        let mut items: Vec<NodeId> = self.selected_ids().await.into_iter().collect();
        items.sort();
        let report = self.drop_items(&items, DropTarget::from_option(target)).await?;
        self.selection.write().await.clear();
        Ok(report)
    }

    /// Drop `items` onto `target`; see [`MutationCoordinator::drop_items`].
    ///
    /// Partial failures are returned as one aggregate error after the
    /// successful moves have been applied to the cache.
    pub async fn drop_items(&self, items: &[NodeId], target: DropTarget) -> AppResult<BatchMoveReport> {
        let report = self.mutations.drop_items(items, &target).await?;
        self.apply_effect(&report.effect).await;

        if !report.moved.is_empty() {
            self.events.publish(EventPayload::NodesMoved {
                node_ids: report.moved.clone(),
                target: report.target.clone(),
            });
        }
        match report.aggregate_error() {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Delete the selected nodes with their subtrees.
    pub async fn delete_selection(&self) -> AppResult<Vec<NodeId>> {
        let mut items: Vec<NodeId> = self.selected_ids().await.into_iter().collect();
        items.sort();
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let (deleted, effect) = self.mutations.delete_nodes(&items).await?;
        {
            let mut state = self.state.write().await;
            for id in &deleted {
                state.expanded.remove(id);
            }
        }
        self.selection.write().await.remove(&deleted);
        self.apply_effect(&effect).await;

        self.events.publish(EventPayload::NodesDeleted {
            node_ids: deleted.clone(),
        });
        Ok(deleted)
    }

    /// Re-fetch what a mutation made stale and the user can see: the root
    /// forest and invalidated nodes that are expanded.
    async fn apply_effect(&self, effect: &CacheEffect) {
        if effect.root_changed {
            self.reload_root().await;
        }

        let visible: Vec<NodeId> = {
            let state = self.state.read().await;
            effect
                .invalidated
                .iter()
                .filter(|id| state.expanded.contains(*id) || state.scope.as_ref() == Some(*id))
                .cloned()
                .collect()
        };
        let results = join_all(visible.iter().map(|id| self.cache.fetch_children(id))).await;

        let mut state = self.state.write().await;
        for (id, result) in visible.iter().zip(results) {
            if let Err(e) = result {
                state.expanded.remove(id);
                self.events.load_failed(Some(id.clone()), &e);
            }
        }
    }
}
