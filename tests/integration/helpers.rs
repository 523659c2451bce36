//! Shared test helpers for integration tests.

use std::sync::Arc;

use assethub_core::config::AppConfig;
use assethub_core::types::{NodeId, SortField, SortKey, SortOption, WorkspaceId};
use assethub_entity::node::{AssetKind, TreeNode};
use assethub_entity::view::ViewItem;
use assethub_service::{AssetExplorer, MemoryBackend, WorkspaceContext};

/// Test workspace id.
pub const WORKSPACE: WorkspaceId = WorkspaceId(7);

/// Explorer wired to an in-memory backend
pub struct TestApp {
    /// Backend serving tree, mutation, and search calls
    pub backend: Arc<MemoryBackend>,
    /// Explorer under test
    pub explorer: AssetExplorer,
}

impl TestApp {
    /// Explorer over the standard fixture tree with default config
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Explorer over the standard fixture tree
    pub fn with_config(config: AppConfig) -> Self {
        Self::with_nodes(config, fixture_tree())
    }

    /// Explorer over custom nodes
    pub fn with_nodes(config: AppConfig, nodes: Vec<TreeNode>) -> Self {
        let backend = Arc::new(MemoryBackend::from_nodes(nodes));
        let explorer = AssetExplorer::new(&config, backend.clone(), backend.clone(), backend.clone());
        Self { backend, explorer }
    }

    /// Bind to the test workspace and sort by name ascending
    pub async fn init(&self) {
        self.init_with(WorkspaceContext::new(WORKSPACE)).await;
    }

    /// Bind to a specific workspace context
    pub async fn init_with(&self, workspace: WorkspaceContext) {
        self.explorer.init(workspace).await;
        self.explorer
            .set_sort_option(SortOption::single(SortField::asc(SortKey::Name)))
            .await;
    }

    /// Expand each id in order, asserting success
    pub async fn expand(&self, ids: &[NodeId]) {
        for id in ids {
            assert!(self.explorer.toggle_expand(id).await, "failed to expand {id}");
        }
    }
}

/// Fixture tree:
///
/// ```text
/// bundle-1 Marketing
///   bundle-2 Campaigns
///     asset-21 launch video (video)
///     asset-22 poster.png (image)
///   asset-11 brand guide.pdf (pdf, container)
///     asset-111 page 1 (pdf_page)
///   asset-12 press release (article, container)
///     asset-121 hero.png (image)
///     asset-122 quote.txt (text)
/// bundle-3 Archive
///   asset-31 old report.pdf (pdf)
/// bundle-4 Empty
/// asset-5 readme.txt (text)
/// ```
pub fn fixture_tree() -> Vec<TreeNode> {
    let b = NodeId::bundle;
    let a = NodeId::asset;
    vec![
        TreeNode::bundle(1, "Marketing"),
        TreeNode::bundle(2, "Campaigns").with_parent(b(1)),
        TreeNode::asset(21, "launch video", AssetKind::Video).with_parent(b(2)),
        TreeNode::asset(22, "poster.png", AssetKind::Image).with_parent(b(2)),
        TreeNode::asset(11, "brand guide.pdf", AssetKind::Pdf)
            .as_container()
            .with_parent(b(1)),
        TreeNode::asset(111, "page 1", AssetKind::PdfPage).with_parent(a(11)),
        TreeNode::asset(12, "press release", AssetKind::Article)
            .as_container()
            .with_parent(b(1)),
        TreeNode::asset(121, "hero.png", AssetKind::Image).with_parent(a(12)),
        TreeNode::asset(122, "quote.txt", AssetKind::Text).with_parent(a(12)),
        TreeNode::bundle(3, "Archive"),
        TreeNode::asset(31, "old report.pdf", AssetKind::Pdf).with_parent(b(3)),
        TreeNode::bundle(4, "Empty"),
        TreeNode::asset(5, "readme.txt", AssetKind::Text),
    ]
}

/// Find an item anywhere in a composed view
pub fn find<'a>(items: &'a [ViewItem], id: &NodeId) -> Option<&'a ViewItem> {
    items.iter().find_map(|item| {
        if &item.id == id {
            return Some(item);
        }
        item.children.as_deref().and_then(|children| find(children, id))
    })
}

/// Ids of one level of a composed view
pub fn ids(items: &[ViewItem]) -> Vec<NodeId> {
    items.iter().map(|item| item.id.clone()).collect()
}
