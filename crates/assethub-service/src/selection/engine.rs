//! Selection set with cascading full/partial state.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use assethub_cache::TreeCache;
use assethub_core::types::NodeId;
use assethub_entity::view::SelectionState;

use super::policy::{CascadePolicy, ImageAttachmentPolicy};

/// Result of a single toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Whether the toggled id is selected afterwards.
    pub selected: bool,
    /// Ids pulled in by the cascade policy.
    pub auto_added: usize,
}

/// Cascading state of a subtree given its enumerated ids (self first).
///
/// Full takes precedence: a subtree is `Partial` only when it is not
/// fully selected and at least one id in it is selected.
pub fn selection_state(selected: &HashSet<NodeId>, subtree: &[NodeId]) -> SelectionState {
    if subtree.is_empty() {
        return SelectionState::None;
    }
    let hits = subtree.iter().filter(|id| selected.contains(*id)).count();
    if hits == subtree.len() {
        SelectionState::Full
    } else if hits > 0 {
        SelectionState::Partial
    } else {
        SelectionState::None
    }
}

/// Set of selected node ids.
///
/// Ids are plain strings to this engine; an id that no snapshot knows
/// about can be selected and simply stays inert.
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    /// Source of descendant enumeration and node lookups.
    cache: TreeCache,
    /// Auto-selection rule for newly selected nodes.
    policy: Arc<dyn CascadePolicy>,
    /// Current selection.
    selected: HashSet<NodeId>,
}

impl SelectionEngine {
    /// Create an empty selection with the default cascade policy.
    pub fn new(cache: TreeCache) -> Self {
        Self::with_policy(cache, Arc::new(ImageAttachmentPolicy))
    }

    /// Create an empty selection with a custom cascade policy.
    pub fn with_policy(cache: TreeCache, policy: Arc<dyn CascadePolicy>) -> Self {
        Self {
            cache,
            policy,
            selected: HashSet::new(),
        }
    }

    /// Toggle `id`.
    ///
    /// Without `multi_select` the selection becomes `{id}`. With it, `id`
    /// is added if absent and removed if present. Whenever `id` ends up
    /// selected, the cascade policy may add cached companions; removal
    /// never cascades.
    pub fn toggle(&mut self, id: &NodeId, multi_select: bool) -> ToggleOutcome {
        if multi_select && self.selected.remove(id) {
            return ToggleOutcome {
                selected: false,
                auto_added: 0,
            };
        }

        if !multi_select {
            self.selected.clear();
        }
        self.selected.insert(id.clone());

        let auto_added = self.apply_policy(id);
        ToggleOutcome {
            selected: true,
            auto_added,
        }
    }

    fn apply_policy(&mut self, id: &NodeId) -> usize {
        let Some(node) = self.cache.find_node(id) else {
            return 0;
        };
        let added = self
            .policy
            .companions(&node, &self.cache)
            .into_iter()
            .filter(|companion| self.selected.insert(companion.clone()))
            .count();
        if added > 0 {
            debug!(node_id = %id, added, "Auto-selected cached children");
        }
        added
    }

    /// Replace the selection with `ids`.
    pub fn select_all_visible(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.selected = ids.into_iter().collect();
    }

    /// Empty the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drop `ids` from the selection (after deletions).
    pub fn remove<'a>(&mut self, ids: impl IntoIterator<Item = &'a NodeId>) {
        for id in ids {
            self.selected.remove(id);
        }
    }

    /// Add or remove `id` together with every cached descendant.
    ///
    /// Uncached descendants are not reached. Returns how many ids changed.
    pub fn toggle_bundle_cascade(&mut self, id: &NodeId, select: bool) -> usize {
        let subtree = self.cache.descendant_ids(id);
        if select {
            subtree
                .into_iter()
                .filter(|node_id| self.selected.insert(node_id.clone()))
                .count()
        } else {
            subtree
                .iter()
                .filter(|node_id| self.selected.remove(*node_id))
                .count()
        }
    }

    /// Cascading state of `id` and its cached descendants.
    pub fn selection_state(&self, id: &NodeId) -> SelectionState {
        selection_state(&self.selected, &self.cache.descendant_ids(id))
    }

    /// Whether `id` and every cached descendant are selected.
    pub fn is_bundle_fully_selected(&self, id: &NodeId) -> bool {
        self.selection_state(id) == SelectionState::Full
    }

    /// Whether some, but not all, of `id`'s cached subtree is selected.
    pub fn is_bundle_partially_selected(&self, id: &NodeId) -> bool {
        self.selection_state(id) == SelectionState::Partial
    }

    /// Whether `id` itself is selected.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.selected.contains(id)
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Immutable copy of the selection.
    pub fn selected(&self) -> HashSet<NodeId> {
        self.selected.clone()
    }

    /// Borrow the selection.
    pub fn as_set(&self) -> &HashSet<NodeId> {
        &self.selected
    }
}
