//! Client-side cache configuration.

use serde::{Deserialize, Serialize};

/// Tree cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of memoized per-level sort orders.
    #[serde(default = "default_sort_memo_capacity")]
    pub sort_memo_capacity: u64,
    /// Children requested per page when expanding a node (1 to 500).
    #[serde(default = "default_children_page_size")]
    pub children_page_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sort_memo_capacity: default_sort_memo_capacity(),
            children_page_size: default_children_page_size(),
        }
    }
}

fn default_sort_memo_capacity() -> u64 {
    1024
}

fn default_children_page_size() -> usize {
    100
}
