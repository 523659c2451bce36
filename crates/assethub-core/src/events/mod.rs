//! Events emitted by the explorer.
//!
//! Read operations never fail loudly; their errors, together with
//! informational notices (auto-selected children, search fallback,
//! refresh summaries), are published on the explorer's event channel
//! for the UI to turn into notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::search::SearchMode;
use crate::error::ErrorKind;
use crate::types::NodeId;

/// Wrapper for all explorer events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: EventPayload,
}

impl ExplorerEvent {
    /// Create a new event stamped with the current time.
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Union of all explorer event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// A root or children fetch failed; the node stays collapsed.
    LoadFailed {
        /// The node whose children failed to load (`None` for the root forest).
        node_id: Option<NodeId>,
        /// Error category.
        kind: ErrorKind,
        /// Error message.
        message: String,
    },
    /// Selecting a composite asset pulled in some of its loaded children.
    AutoSelected {
        /// The asset the user selected.
        parent_id: NodeId,
        /// How many children were added.
        added: usize,
    },
    /// A semantic query was answered by lexical search instead.
    SearchFallback {
        /// The query text.
        query: String,
        /// Mode the user asked for.
        requested: SearchMode,
        /// Mode that served the results.
        served_by: SearchMode,
        /// Why the fallback happened.
        reason: String,
    },
    /// An overlay query failed; the overlay shows no results.
    SearchFailed {
        /// The query text.
        query: String,
        /// Error category.
        kind: ErrorKind,
        /// Error message.
        message: String,
    },
    /// A refresh finished.
    RefreshCompleted {
        /// Expanded nodes whose children were re-fetched.
        restored: usize,
        /// Expanded nodes that could not be re-fetched and were collapsed.
        dropped: Vec<NodeId>,
    },
    /// Nodes were reparented.
    NodesMoved {
        /// Moved node ids.
        node_ids: Vec<NodeId>,
        /// New parent (`None` for the root level).
        target: Option<NodeId>,
    },
    /// Nodes were deleted.
    NodesDeleted {
        /// Deleted node ids.
        node_ids: Vec<NodeId>,
    },
}
