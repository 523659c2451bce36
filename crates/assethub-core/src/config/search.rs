//! Search overlay configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which search collaborator serves an overlay query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Server-side keyword/substring matching.
    Lexical,
    /// Embedding similarity search.
    Semantic,
}

impl Default for SearchMode {
    fn default() -> Self {
        Self::Lexical
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Semantic => write!(f, "semantic"),
        }
    }
}

/// Search overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Preferred mode until the user changes it.
    #[serde(default)]
    pub default_mode: SearchMode,
    /// When `false`, search terms only drive the local recursive filter.
    #[serde(default = "default_true")]
    pub remote_enabled: bool,
    /// Delay before a query is sent; superseded queries are never sent.
    #[serde(default)]
    pub debounce_ms: u64,
    /// Maximum number of ranked results requested per query.
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_mode: SearchMode::default(),
            remote_enabled: true,
            debounce_ms: 0,
            result_limit: default_result_limit(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_result_limit() -> usize {
    50
}
