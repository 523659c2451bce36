//! In-memory backend for tests and offline inspection.
//!
//! Holds a flat node table and answers the tree, mutation, and search
//! APIs from it. Failure injection, latency, and call counters make it
//! usable as a test double for every explorer collaborator.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use assethub_cache::TreeSource;
use assethub_core::config::search::SearchMode;
use assethub_core::error::AppError;
use assethub_core::result::AppResult;
use assethub_core::types::{NodeId, NodeType, WorkspaceId};
use assethub_entity::node::{AssetSummary, ChildrenPage, NodeCounts, PageRequest, TreeNode};
use assethub_entity::search::{RankedAsset, SearchFilters};

use super::{SearchProvider, TreeMutator};

/// Serialized form accepted by [`MemoryBackend::from_json`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Every node of the workspace, parents referenced by `parent_id`.
    pub nodes: Vec<TreeNode>,
    /// Whether the semantic index is available.
    #[serde(default)]
    pub embeddings: bool,
}

/// Node table in insertion order.
#[derive(Debug, Default)]
struct NodeTable {
    nodes: HashMap<NodeId, TreeNode>,
    order: Vec<NodeId>,
}

impl NodeTable {
    fn insert(&mut self, node: TreeNode) {
        if !self.nodes.contains_key(&node.id) {
            self.order.push(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
    }

    fn children_of(&self, parent: Option<&NodeId>) -> Vec<TreeNode> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .filter(|node| node.parent_id.as_ref() == parent)
            .map(|node| self.with_counts(node))
            .collect()
    }

    /// Copy of `node` with direct-children counts filled in for bundles.
    fn with_counts(&self, node: &TreeNode) -> TreeNode {
        let mut node = node.clone();
        if node.is_bundle() {
            let mut counts = NodeCounts::default();
            for child in self.nodes.values() {
                if child.parent_id.as_ref() == Some(&node.id) {
                    match child.node_type {
                        NodeType::Asset => counts.asset_count += 1,
                        NodeType::Bundle => counts.child_bundle_count += 1,
                    }
                }
            }
            node.counts = counts;
        }
        node
    }

    /// Whether `candidate` is `ancestor` or lies beneath it.
    fn is_within(&self, candidate: &NodeId, ancestor: &NodeId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(candidate.clone());
        while let Some(id) = current {
            if &id == ancestor {
                return true;
            }
            if !seen.insert(id.clone()) {
                return false;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent_id.clone());
        }
        false
    }

    fn subtree(&self, root: &NodeId) -> Vec<NodeId> {
        self.order
            .iter()
            .filter(|id| self.is_within(id, root))
            .cloned()
            .collect()
    }

    fn next_bundle_id(&self) -> i64 {
        self.nodes
            .keys()
            .filter_map(|id| id.parse().ok())
            .filter(|(node_type, _)| *node_type == NodeType::Bundle)
            .map(|(_, n)| n)
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Tracks concurrent fetches for the lifetime of one call.
struct InFlight<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

/// In-memory implementation of [`TreeSource`], [`TreeMutator`], and
/// [`SearchProvider`].
#[derive(Debug, Default)]
pub struct MemoryBackend {
    table: Mutex<NodeTable>,
    /// Whether semantic search is answered.
    embeddings: AtomicBool,
    /// Fail root fetches with a network error.
    root_failing: AtomicBool,
    /// Children fetches for these nodes fail with a network error.
    failing_children: Mutex<HashSet<NodeId>>,
    /// Moves of these nodes fail with a network error.
    failing_moves: Mutex<HashSet<NodeId>>,
    /// Simulated round-trip time of every call.
    latency: Mutex<Duration>,
    root_calls: AtomicUsize,
    child_calls: Mutex<HashMap<NodeId, usize>>,
    move_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    searches: Mutex<Vec<(SearchMode, String)>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend holding `nodes`.
    pub fn from_nodes(nodes: impl IntoIterator<Item = TreeNode>) -> Self {
        let backend = Self::new();
        for node in nodes {
            backend.insert(node);
        }
        backend
    }

    /// Load a [`MemorySnapshot`] from JSON.
    pub fn from_json(json: &str) -> AppResult<Self> {
        let snapshot: MemorySnapshot = serde_json::from_str(json)?;
        let backend = Self::from_nodes(snapshot.nodes);
        backend.set_embeddings(snapshot.embeddings);
        Ok(backend)
    }

    /// Insert or replace a node.
    pub fn insert(&self, node: TreeNode) {
        self.table().insert(node);
    }

    /// Current copy of a node.
    pub fn node(&self, id: &NodeId) -> Option<TreeNode> {
        self.table().nodes.get(id).cloned()
    }

    /// Number of nodes held.
    pub fn len(&self) -> usize {
        self.table().nodes.len()
    }

    /// Whether the backend holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enable or disable the semantic index.
    pub fn set_embeddings(&self, available: bool) {
        self.embeddings.store(available, Ordering::SeqCst);
    }

    /// Make root fetches fail (or succeed again).
    pub fn fail_root(&self, failing: bool) {
        self.root_failing.store(failing, Ordering::SeqCst);
    }

    /// Make children fetches for `id` fail.
    pub fn fail_children(&self, id: &NodeId) {
        self.lock(&self.failing_children).insert(id.clone());
    }

    /// Let children fetches for `id` succeed again.
    pub fn recover_children(&self, id: &NodeId) {
        self.lock(&self.failing_children).remove(id);
    }

    /// Make moves of `id` fail.
    pub fn fail_move(&self, id: &NodeId) {
        self.lock(&self.failing_moves).insert(id.clone());
    }

    /// Set the simulated latency.
    pub fn set_latency(&self, latency: Duration) {
        *self.lock(&self.latency) = latency;
    }

    /// Number of root fetches served.
    pub fn root_calls(&self) -> usize {
        self.root_calls.load(Ordering::SeqCst)
    }

    /// Number of children fetches received for `id`.
    pub fn child_calls(&self, id: &NodeId) -> usize {
        self.lock(&self.child_calls).get(id).copied().unwrap_or(0)
    }

    /// Number of children fetches received for any node.
    pub fn total_child_calls(&self) -> usize {
        self.lock(&self.child_calls).values().sum()
    }

    /// Number of move requests received.
    pub fn move_calls(&self) -> usize {
        self.move_calls.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous fetches observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Search requests received, in order.
    pub fn searches(&self) -> Vec<(SearchMode, String)> {
        self.lock(&self.searches).clone()
    }

    fn table(&self) -> std::sync::MutexGuard<'_, NodeTable> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn simulate_latency(&self) {
        let latency = *self.lock(&self.latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    /// Asset candidates for a search, honoring the kind filter.
    fn search_candidates(&self, filters: &SearchFilters) -> Vec<AssetSummary> {
        let table = self.table();
        table
            .order
            .iter()
            .filter_map(|id| table.nodes.get(id))
            .filter(|node| node.node_type == NodeType::Asset)
            .filter(|node| match (&filters.kinds, node.kind) {
                (Some(kinds), Some(kind)) => kinds.contains(&kind),
                (Some(_), None) => false,
                (None, _) => true,
            })
            .map(AssetSummary::from_node)
            .collect()
    }

    fn record_search(&self, mode: SearchMode, query: &str) {
        self.lock(&self.searches).push((mode, query.to_string()));
    }
}

fn rank(mut hits: Vec<RankedAsset>, filters: &SearchFilters) -> Vec<RankedAsset> {
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    if let Some(limit) = filters.limit {
        hits.truncate(limit);
    }
    hits
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl TreeSource for MemoryBackend {
    async fn fetch_root_nodes(&self, _workspace: WorkspaceId) -> AppResult<Vec<TreeNode>> {
        let _guard = InFlight::enter(&self.in_flight, &self.peak_in_flight);
        self.root_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.root_failing.load(Ordering::SeqCst) {
            return Err(AppError::network("Root fetch failed"));
        }
        Ok(self.table().children_of(None))
    }

    async fn fetch_child_nodes(
        &self,
        _workspace: WorkspaceId,
        node_id: &NodeId,
        page: PageRequest,
    ) -> AppResult<ChildrenPage> {
        let _guard = InFlight::enter(&self.in_flight, &self.peak_in_flight);
        *self.lock(&self.child_calls).entry(node_id.clone()).or_insert(0) += 1;
        self.simulate_latency().await;

        if self.lock(&self.failing_children).contains(node_id) {
            return Err(AppError::network(format!(
                "Children fetch for {node_id} failed"
            )));
        }

        let table = self.table();
        if !table.nodes.contains_key(node_id) {
            return Err(AppError::not_found(format!("Node {node_id} not found")));
        }
        Ok(ChildrenPage::slice(table.children_of(Some(node_id)), page))
    }
}

#[async_trait]
impl TreeMutator for MemoryBackend {
    async fn move_node(
        &self,
        _workspace: WorkspaceId,
        node_id: &NodeId,
        new_parent: Option<&NodeId>,
    ) -> AppResult<()> {
        self.move_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.lock(&self.failing_moves).contains(node_id) {
            return Err(AppError::network(format!("Move of {node_id} failed")));
        }

        let mut table = self.table();
        if !table.nodes.contains_key(node_id) {
            return Err(AppError::not_found(format!("Node {node_id} not found")));
        }

        if let Some(target) = new_parent {
            let target_node = table
                .nodes
                .get(target)
                .ok_or_else(|| AppError::not_found(format!("Target {target} not found")))?;
            if !target_node.is_container {
                return Err(AppError::validation(format!(
                    "Target {target} cannot hold children"
                )));
            }
            if table.is_within(target, node_id) {
                return Err(AppError::validation(format!(
                    "Cannot move {node_id} into itself or its own descendant"
                )));
            }
        }

        if let Some(node) = table.nodes.get_mut(node_id) {
            node.parent_id = new_parent.cloned();
            node.updated_at = Utc::now();
        }
        tracing::debug!(node_id = %node_id, "Moved node in memory backend");
        Ok(())
    }

    async fn create_bundle(
        &self,
        _workspace: WorkspaceId,
        name: &str,
        parent: Option<&NodeId>,
    ) -> AppResult<TreeNode> {
        self.simulate_latency().await;

        let mut table = self.table();
        if let Some(parent) = parent {
            match table.nodes.get(parent) {
                Some(node) if node.is_bundle() => {}
                Some(_) => {
                    return Err(AppError::validation(format!(
                        "Bundles can only be created inside bundles, not {parent}"
                    )));
                }
                None => return Err(AppError::not_found(format!("Parent {parent} not found"))),
            }
        }

        let mut bundle = TreeNode::bundle(table.next_bundle_id(), name);
        bundle.parent_id = parent.cloned();
        table.insert(bundle.clone());
        Ok(bundle)
    }

    async fn delete_nodes(
        &self,
        _workspace: WorkspaceId,
        node_ids: &[NodeId],
    ) -> AppResult<Vec<NodeId>> {
        self.simulate_latency().await;

        let mut table = self.table();
        let mut removed = Vec::new();
        for id in node_ids {
            if !table.nodes.contains_key(id) {
                continue;
            }
            for gone in table.subtree(id) {
                table.nodes.remove(&gone);
            }
            removed.push(id.clone());
        }
        let NodeTable { nodes, order } = &mut *table;
        order.retain(|id| nodes.contains_key(id));
        Ok(removed)
    }
}

#[async_trait]
impl SearchProvider for MemoryBackend {
    async fn search_lexical(
        &self,
        _workspace: WorkspaceId,
        query: &str,
        filters: &SearchFilters,
    ) -> AppResult<Vec<RankedAsset>> {
        self.record_search(SearchMode::Lexical, query);
        self.simulate_latency().await;

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let hits = self
            .search_candidates(filters)
            .into_iter()
            .filter_map(|asset| {
                let name = asset.name.to_lowercase();
                if !name.contains(&needle) {
                    return None;
                }
                let score = needle.chars().count() as f32 / name.chars().count().max(1) as f32;
                Some(RankedAsset { asset, score })
            })
            .collect();
        Ok(rank(hits, filters))
    }

    async fn search_semantic(
        &self,
        _workspace: WorkspaceId,
        query: &str,
        filters: &SearchFilters,
    ) -> AppResult<Vec<RankedAsset>> {
        self.record_search(SearchMode::Semantic, query);
        self.simulate_latency().await;

        if !self.embeddings.load(Ordering::SeqCst) {
            return Err(AppError::embeddings_unavailable(
                "No embeddings indexed for this workspace",
            ));
        }

        let wanted = tokens(query);
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let hits = self
            .search_candidates(filters)
            .into_iter()
            .filter_map(|asset| {
                let overlap = tokens(&asset.name).intersection(&wanted).count();
                if overlap == 0 {
                    return None;
                }
                let score = overlap as f32 / wanted.len() as f32;
                Some(RankedAsset { asset, score })
            })
            .collect();
        Ok(rank(hits, filters))
    }
}
