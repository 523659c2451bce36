//! Remote collaborators used by the explorer services.
//!
//! The read side of the tree API lives in `assethub-cache` as
//! [`TreeSource`](assethub_cache::TreeSource); the write side and the two
//! search endpoints are declared here. [`MemoryBackend`] implements all
//! three for tests and offline use.

pub mod memory;

use async_trait::async_trait;

use assethub_core::result::AppResult;
use assethub_core::types::{NodeId, WorkspaceId};
use assethub_entity::node::TreeNode;
use assethub_entity::search::{RankedAsset, SearchFilters};

pub use memory::MemoryBackend;

/// Write side of the remote tree API.
#[async_trait]
pub trait TreeMutator: Send + Sync + std::fmt::Debug + 'static {
    /// Reparent a node. `None` moves it to the top level.
    ///
    /// Fails with `Validation` when the move would create a cycle or the
    /// target cannot hold children.
    async fn move_node(
        &self,
        workspace: WorkspaceId,
        node_id: &NodeId,
        new_parent: Option<&NodeId>,
    ) -> AppResult<()>;

    /// Create an empty bundle under `parent` (or at the top level).
    async fn create_bundle(
        &self,
        workspace: WorkspaceId,
        name: &str,
        parent: Option<&NodeId>,
    ) -> AppResult<TreeNode>;

    /// Delete nodes together with their subtrees. Returns the ids that
    /// were actually removed.
    async fn delete_nodes(&self, workspace: WorkspaceId, node_ids: &[NodeId])
    -> AppResult<Vec<NodeId>>;
}

/// Remote search endpoints.
#[async_trait]
pub trait SearchProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Keyword search over asset names and content.
    async fn search_lexical(
        &self,
        workspace: WorkspaceId,
        query: &str,
        filters: &SearchFilters,
    ) -> AppResult<Vec<RankedAsset>>;

    /// Embedding similarity search.
    ///
    /// Fails with `EmbeddingsUnavailable` when the workspace has no index.
    async fn search_semantic(
        &self,
        workspace: WorkspaceId,
        query: &str,
        filters: &SearchFilters,
    ) -> AppResult<Vec<RankedAsset>>;
}
