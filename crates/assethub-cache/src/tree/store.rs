//! Lazy-loading tree cache with per-node request deduplication.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, info, warn};

use assethub_core::error::AppError;
use assethub_core::result::AppResult;
use assethub_core::types::{NodeId, WorkspaceId};
use assethub_entity::node::{ChildrenPage, PageRequest, TreeNode};
use assethub_entity::node::page::DEFAULT_PAGE_SIZE;

use super::snapshot::{CachedLevel, ParentRef, TreeSnapshot};
use crate::source::TreeSource;

type LoadResult = Result<Arc<Vec<TreeNode>>, AppError>;
type SharedLoad = Shared<BoxFuture<'static, LoadResult>>;

/// Client-side cache of a server-held forest.
///
/// Cheap to clone; all clones share the same state. Children entries are
/// present only for nodes fetched since the last invalidation, and an empty
/// entry means "known empty". An entry may hold only the first pages of a
/// long children list (`has_more`); [`TreeCache::load_more`] extends it. At
/// most one children fetch per node and one root fetch are in flight at any
/// time; duplicate callers await the same shared load.
#[derive(Clone)]
pub struct TreeCache {
    inner: Arc<TreeCacheInner>,
}

struct TreeCacheInner {
    /// Remote tree API.
    source: Arc<dyn TreeSource>,
    /// Children requested per page.
    page_size: usize,
    /// Active workspace, `None` until `init`.
    workspace: RwLock<Option<WorkspaceId>>,
    /// Bumped on every `init`/`reset`; loads from older epochs are dropped.
    epoch: AtomicU64,
    /// Source of per-level versions.
    version: AtomicU64,
    /// Top-level forest.
    roots: RwLock<Option<CachedLevel>>,
    /// Children entries keyed by parent id.
    children: DashMap<NodeId, CachedLevel>,
    /// Every node seen in a cached level, for lookups by id.
    nodes: DashMap<NodeId, TreeNode>,
    /// In-flight children loads.
    pending: DashMap<NodeId, SharedLoad>,
    /// In-flight root load.
    root_pending: Mutex<Option<SharedLoad>>,
}

impl fmt::Debug for TreeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeCache")
            .field("workspace", &self.workspace())
            .field("epoch", &self.inner.epoch.load(Ordering::SeqCst))
            .field("children", &self.inner.children.len())
            .field("pending", &self.inner.pending.len())
            .finish()
    }
}

impl TreeCache {
    /// Create an empty cache reading from `source`.
    pub fn new(source: Arc<dyn TreeSource>) -> Self {
        Self::with_page_size(source, DEFAULT_PAGE_SIZE)
    }

    /// Create an empty cache fetching `page_size` children per request.
    pub fn with_page_size(source: Arc<dyn TreeSource>, page_size: usize) -> Self {
        Self {
            inner: Arc::new(TreeCacheInner {
                source,
                page_size: PageRequest::first(page_size).limit,
                workspace: RwLock::new(None),
                epoch: AtomicU64::new(0),
                version: AtomicU64::new(0),
                roots: RwLock::new(None),
                children: DashMap::new(),
                nodes: DashMap::new(),
                pending: DashMap::new(),
                root_pending: Mutex::new(None),
            }),
        }
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Bind the cache to a workspace, discarding all state.
    pub fn init(&self, workspace: WorkspaceId) {
        self.clear_state();
        *self.inner.workspace.write().unwrap_or_else(|e| e.into_inner()) = Some(workspace);
        info!(workspace = %workspace, "Tree cache bound to workspace");
    }

    /// Discard all state and unbind from the workspace.
    pub fn reset(&self) {
        self.clear_state();
        *self.inner.workspace.write().unwrap_or_else(|e| e.into_inner()) = None;
        debug!("Tree cache reset");
    }

    fn clear_state(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        self.inner.pending.clear();
        *self.inner.root_pending.lock().unwrap_or_else(|e| e.into_inner()) = None;
        self.invalidate_all();
    }

    /// The active workspace.
    pub fn workspace(&self) -> Option<WorkspaceId> {
        *self.inner.workspace.read().unwrap_or_else(|e| e.into_inner())
    }

    fn require_workspace(&self) -> AppResult<WorkspaceId> {
        self.workspace()
            .ok_or_else(|| AppError::validation("No active workspace"))
    }

    fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::SeqCst)
    }

    fn next_version(&self) -> u64 {
        self.inner.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    // ── Loads ───────────────────────────────────────────────────

    /// Fetch the root forest and replace the cached roots.
    ///
    /// Concurrent callers share a single request.
    pub async fn fetch_root(&self) -> AppResult<Arc<Vec<TreeNode>>> {
        let load = {
            let mut slot = self
                .inner
                .root_pending
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            match slot.as_ref() {
                Some(load) => {
                    debug!("Joining in-flight root load");
                    load.clone()
                }
                None => {
                    let load = self.clone().load_root(self.epoch()).boxed().shared();
                    *slot = Some(load.clone());
                    load
                }
            }
        };
        load.await
    }

    async fn load_root(self, epoch: u64) -> LoadResult {
        let result = match self.require_workspace() {
            Ok(workspace) => self.inner.source.fetch_root_nodes(workspace).await,
            Err(e) => Err(e),
        };

        if self.epoch() != epoch {
            return Err(AppError::conflict("Workspace changed while loading the root"));
        }
        *self
            .inner
            .root_pending
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = None;

        match result {
            Ok(nodes) => {
                let nodes = Arc::new(nodes);
                info!(count = nodes.len(), "Root nodes loaded");
                self.store_roots(nodes.clone());
                Ok(nodes)
            }
            Err(e) => {
                warn!(error = %e, "Root load failed");
                Err(e)
            }
        }
    }

    /// Return the children of `node_id`, fetching them if not cached.
    ///
    /// A cached entry (even an empty one) is returned without a network
    /// call. When a fetch for the node is already in flight the caller
    /// awaits it instead of issuing another. On failure the node stays
    /// absent from the cache so a later call retries.
    pub async fn fetch_children(&self, node_id: &NodeId) -> AppResult<Arc<Vec<TreeNode>>> {
        if let Some(level) = self.inner.children.get(node_id) {
            debug!(node_id = %node_id, "Children cache hit");
            return Ok(level.nodes.clone());
        }

        let load = match self.inner.pending.entry(node_id.clone()) {
            Entry::Occupied(entry) => {
                debug!(node_id = %node_id, "Joining in-flight children load");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                // A load may have completed between the hit check and the entry lock.
                if let Some(level) = self.inner.children.get(node_id) {
                    return Ok(level.nodes.clone());
                }
                let load = self
                    .clone()
                    .load_page(node_id.clone(), 0, self.epoch())
                    .boxed()
                    .shared();
                entry.insert(load.clone());
                load
            }
        };

        load.await
    }

    /// Append the next page of `node_id`'s children to its entry.
    ///
    /// An uncached node loads its first page; a complete entry is returned
    /// without a network call. Page loads share the in-flight slot with
    /// [`TreeCache::fetch_children`], so a caller arriving while any load
    /// of the node is running awaits that load instead.
    pub async fn load_more(&self, node_id: &NodeId) -> AppResult<Arc<Vec<TreeNode>>> {
        let load = match self.inner.pending.entry(node_id.clone()) {
            Entry::Occupied(entry) => {
                debug!(node_id = %node_id, "Joining in-flight children load");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let skip = match self.inner.children.get(node_id) {
                    Some(level) if !level.has_more => return Ok(level.nodes.clone()),
                    Some(level) => level.nodes.len(),
                    None => 0,
                };
                let load = self
                    .clone()
                    .load_page(node_id.clone(), skip, self.epoch())
                    .boxed()
                    .shared();
                entry.insert(load.clone());
                load
            }
        };

        load.await
    }

    async fn load_page(self, node_id: NodeId, skip: usize, epoch: u64) -> LoadResult {
        let page = PageRequest::new(skip, self.inner.page_size);
        let result = match self.require_workspace() {
            Ok(workspace) => {
                self.inner
                    .source
                    .fetch_child_nodes(workspace, &node_id, page)
                    .await
            }
            Err(e) => Err(e),
        };

        if self.epoch() != epoch {
            return Err(AppError::conflict(format!(
                "Workspace changed while loading children of {node_id}"
            )));
        }

        let outcome = match result {
            Ok(page) => {
                debug!(
                    node_id = %node_id,
                    skip,
                    count = page.children.len(),
                    total = page.total_children,
                    "Children loaded"
                );
                if skip == 0 {
                    Ok(self.store_children(node_id.clone(), page))
                } else {
                    self.append_children(&node_id, skip, page)
                }
            }
            Err(e) => {
                warn!(node_id = %node_id, error = %e, "Children load failed");
                Err(e)
            }
        };

        self.inner.pending.remove(&node_id);
        outcome
    }

    /// Fetch the root forest without touching the cache.
    pub async fn fetch_root_uncached(&self) -> AppResult<Vec<TreeNode>> {
        let workspace = self.require_workspace()?;
        self.inner.source.fetch_root_nodes(workspace).await
    }

    /// Fetch the first page of `node_id`'s children without touching the cache.
    pub async fn fetch_children_uncached(&self, node_id: &NodeId) -> AppResult<ChildrenPage> {
        let workspace = self.require_workspace()?;
        self.inner
            .source
            .fetch_child_nodes(workspace, node_id, PageRequest::first(self.inner.page_size))
            .await
    }

    // ── Writes ──────────────────────────────────────────────────

    fn store_roots(&self, nodes: Arc<Vec<TreeNode>>) {
        self.index(&nodes);
        let level = CachedLevel {
            total: nodes.len(),
            has_more: false,
            nodes,
            version: self.next_version(),
        };
        *self.inner.roots.write().unwrap_or_else(|e| e.into_inner()) = Some(level);
    }

    fn store_children(&self, node_id: NodeId, page: ChildrenPage) -> Arc<Vec<TreeNode>> {
        self.index(&page.children);
        let nodes = Arc::new(page.children);
        let level = CachedLevel {
            nodes: nodes.clone(),
            version: self.next_version(),
            total: page.total_children,
            has_more: page.has_more,
        };
        self.inner.children.insert(node_id, level);
        nodes
    }

    /// Extend an entry with the page fetched at offset `skip`. The entry
    /// must still end at `skip`; otherwise it was replaced meanwhile and
    /// the page is dropped.
    fn append_children(&self, node_id: &NodeId, skip: usize, page: ChildrenPage) -> LoadResult {
        match self.inner.children.get_mut(node_id) {
            Some(mut level) if level.nodes.len() == skip => {
                self.index(&page.children);
                let mut nodes = Vec::with_capacity(skip + page.children.len());
                nodes.extend(level.nodes.iter().cloned());
                nodes.extend(page.children);
                level.nodes = Arc::new(nodes);
                level.total = page.total_children;
                level.has_more = page.has_more;
                level.version = self.next_version();
                Ok(level.nodes.clone())
            }
            _ => Err(AppError::conflict(format!(
                "Children of {node_id} changed while loading more"
            ))),
        }
    }

    fn index(&self, nodes: &[TreeNode]) {
        for node in nodes {
            self.inner.nodes.insert(node.id.clone(), node.clone());
        }
    }

    /// Atomically replace the whole cache with freshly fetched data.
    pub fn replace_all(&self, roots: Vec<TreeNode>, children: HashMap<NodeId, ChildrenPage>) {
        let mut roots_slot = self.inner.roots.write().unwrap_or_else(|e| e.into_inner());
        self.inner.children.clear();
        self.inner.nodes.clear();

        for (node_id, page) in children {
            self.store_children(node_id, page);
        }

        let roots = Arc::new(roots);
        self.index(&roots);
        *roots_slot = Some(CachedLevel {
            total: roots.len(),
            has_more: false,
            nodes: roots,
            version: self.next_version(),
        });
        debug!(entries = self.inner.children.len(), "Tree cache replaced");
    }

    /// Drop the children entry of one node so the next expand re-fetches.
    pub fn invalidate(&self, node_id: &NodeId) -> bool {
        let removed = self.inner.children.remove(node_id).is_some();
        if removed {
            debug!(node_id = %node_id, "Children entry invalidated");
        }
        removed
    }

    /// Drop the roots and every children entry.
    pub fn invalidate_all(&self) {
        *self.inner.roots.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.inner.children.clear();
        self.inner.nodes.clear();
        debug!("Tree cache cleared");
    }

    // ── Reads ───────────────────────────────────────────────────

    /// Cached roots.
    pub fn roots(&self) -> Option<Arc<Vec<TreeNode>>> {
        self.inner
            .roots
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|level| level.nodes.clone())
    }

    /// Cached children of `node_id`.
    pub fn cached_children(&self, node_id: &NodeId) -> Option<Arc<Vec<TreeNode>>> {
        self.inner
            .children
            .get(node_id)
            .map(|level| level.nodes.clone())
    }

    /// Whether `node_id` has a children entry.
    pub fn is_cached(&self, node_id: &NodeId) -> bool {
        self.inner.children.contains_key(node_id)
    }

    /// Whether a children fetch for `node_id` is in flight.
    pub fn is_pending(&self, node_id: &NodeId) -> bool {
        self.inner.pending.contains_key(node_id)
    }

    /// Whether the cached children of `node_id` stop short of the full list.
    pub fn has_more(&self, node_id: &NodeId) -> bool {
        self.inner
            .children
            .get(node_id)
            .is_some_and(|level| level.has_more)
    }

    /// Look up a node seen in any cached level.
    pub fn find_node(&self, node_id: &NodeId) -> Option<TreeNode> {
        self.inner.nodes.get(node_id).map(|node| node.clone())
    }

    /// Locate the level a node is cached in.
    pub fn parent_of(&self, node_id: &NodeId) -> Option<ParentRef> {
        let in_roots = self
            .roots()
            .is_some_and(|roots| roots.iter().any(|n| &n.id == node_id));
        if in_roots {
            return Some(ParentRef::Root);
        }

        self.inner
            .children
            .iter()
            .find(|entry| entry.value().nodes.iter().any(|n| &n.id == node_id))
            .map(|entry| ParentRef::Node(entry.key().clone()))
            .or_else(|| {
                self.find_node(node_id)
                    .and_then(|node| node.parent_id)
                    .map(ParentRef::Node)
            })
    }

    /// `node_id` plus every cached descendant, depth first.
    pub fn descendant_ids(&self, node_id: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![node_id.clone()];
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(nodes) = self.cached_children(&current) {
                for child in nodes.iter().rev() {
                    stack.push(child.id.clone());
                }
            }
            out.push(current);
        }
        out
    }

    /// Copy the current state for the view composer.
    pub fn snapshot(&self) -> TreeSnapshot {
        let roots = self
            .inner
            .roots
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let children = self
            .inner
            .children
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let pending = self
            .inner
            .pending
            .iter()
            .map(|entry| entry.key().clone())
            .collect();

        TreeSnapshot {
            roots,
            children,
            pending,
        }
    }
}
