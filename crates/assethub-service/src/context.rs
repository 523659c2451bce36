//! Workspace context carrying the active workspace and its capabilities.

use serde::{Deserialize, Serialize};

use assethub_core::types::WorkspaceId;

/// Context for the workspace the explorer is bound to.
///
/// Passed to [`AssetExplorer::init`](crate::AssetExplorer::init) and
/// consulted by the search overlay to decide which modes are available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceContext {
    /// The workspace ID.
    pub id: WorkspaceId,
    /// Embedding model configured for the workspace, if any.
    #[serde(default)]
    pub embedding_model: Option<String>,
}

impl WorkspaceContext {
    /// A workspace without semantic search.
    pub fn new(id: WorkspaceId) -> Self {
        Self {
            id,
            embedding_model: None,
        }
    }

    /// Attach an embedding model, enabling semantic search.
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = Some(model.into());
        self
    }

    /// Returns whether semantic search may be offered.
    pub fn semantic_enabled(&self) -> bool {
        self.embedding_model
            .as_deref()
            .is_some_and(|model| !model.trim().is_empty())
    }
}
