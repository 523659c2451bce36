//! Memoized per-level sort orders.
//!
//! Every cached level carries a version that changes whenever the level is
//! replaced, so a level's sorted order only has to be computed once per
//! `(level, version, sort option)`. Entries for superseded versions simply
//! age out of the moka cache.

use std::sync::Arc;

use moka::sync::Cache;

use assethub_core::config::cache::CacheConfig;
use assethub_core::types::{NodeId, SortOption};

/// Key of one memoized order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey {
    /// Parent of the level (`None` for the root forest).
    pub parent: Option<NodeId>,
    /// Version of the cached level.
    pub version: u64,
    /// Ordering applied.
    pub sort: SortOption,
}

/// Bounded memo of sorted index permutations.
#[derive(Debug, Clone)]
pub struct SortMemo {
    cache: Cache<MemoKey, Arc<Vec<usize>>>,
}

impl SortMemo {
    /// Create a memo from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(config.sort_memo_capacity)
                .build(),
        }
    }

    /// Return the memoized permutation for `key`, computing it on a miss.
    pub fn order_with(&self, key: MemoKey, compute: impl FnOnce() -> Vec<usize>) -> Arc<Vec<usize>> {
        self.cache.get_with(key, || Arc::new(compute()))
    }

    /// Drop every memoized order.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for SortMemo {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
