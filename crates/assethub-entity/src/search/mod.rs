//! Search result entities.

use serde::{Deserialize, Serialize};

use assethub_core::config::search::SearchMode;

use crate::node::{AssetKind, AssetSummary};

/// One relevance-ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAsset {
    /// The matching asset.
    pub asset: AssetSummary,
    /// Relevance score; higher is better.
    pub score: f32,
}

/// Filters forwarded to the search collaborators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Restrict hits to these kinds (`None` = any kind).
    #[serde(default)]
    pub kinds: Option<Vec<AssetKind>>,
    /// Maximum number of hits.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Result of one overlay query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// The query text as sent.
    pub query: String,
    /// The mode the user asked for.
    pub requested: SearchMode,
    /// The mode that actually served the results.
    pub served_by: SearchMode,
    /// Whether a semantic query fell back to lexical search.
    pub fell_back: bool,
    /// Hits ordered by descending score.
    pub results: Vec<RankedAsset>,
}
