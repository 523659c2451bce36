//! Tree source trait for the remote tree API.

use async_trait::async_trait;

use assethub_core::result::AppResult;
use assethub_core::types::{NodeId, WorkspaceId};
use assethub_entity::node::{ChildrenPage, PageRequest, TreeNode};

/// Read side of the remote tree API.
///
/// Implementations fail with `Network` or `Authentication` errors. An
/// empty list is a successful answer ("known empty"), never a stand-in
/// for a failure. Children are served in pages; `has_more` on a page
/// means the list continues past it.
#[async_trait]
pub trait TreeSource: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch the top-level forest of a workspace.
    async fn fetch_root_nodes(&self, workspace: WorkspaceId) -> AppResult<Vec<TreeNode>>;

    /// Fetch one page of the direct children of a bundle or container asset.
    async fn fetch_child_nodes(
        &self,
        workspace: WorkspaceId,
        node_id: &NodeId,
        page: PageRequest,
    ) -> AppResult<ChildrenPage>;
}
