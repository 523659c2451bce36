//! Pure composition of the rendered tree from cache and UI state.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use assethub_cache::{CachedLevel, MemoKey, SortMemo, TreeSnapshot};
use assethub_core::types::{NodeId, SortOption};
use assethub_entity::node::TreeNode;
use assethub_entity::search::SearchOutcome;
use assethub_entity::view::{SelectionState, ViewItem};

use super::filter::{TypeFilter, name_matches};
use super::sort::sorted_order;

/// Nesting limit; guards against cycles in a malformed cache.
const MAX_DEPTH: usize = 256;

/// How the search term shapes the view.
#[derive(Debug, Clone, Copy)]
pub enum SearchView<'a> {
    /// The term (possibly empty) filters the cached tree.
    Filter(&'a str),
    /// A remote query is active and replaces the tree. `None` while the
    /// first results are outstanding.
    Overlay(Option<&'a SearchOutcome>),
}

/// Everything the composer reads.
#[derive(Debug, Clone, Copy)]
pub struct ViewInput<'a> {
    /// Cache contents.
    pub snapshot: &'a TreeSnapshot,
    /// Expanded node ids.
    pub expanded: &'a HashSet<NodeId>,
    /// Selected node ids.
    pub selected: &'a HashSet<NodeId>,
    /// Per-level ordering.
    pub sort: SortOption,
    /// Kind filter.
    pub type_filter: &'a TypeFilter,
    /// Search state.
    pub search: SearchView<'a>,
    /// Compose the cached children of this bundle instead of the roots.
    pub scope: Option<&'a NodeId>,
}

/// Builds `ViewItem` trees. Holds only the sort memo; every call is a pure
/// function of its [`ViewInput`].
#[derive(Debug, Clone, Default)]
pub struct ViewComposer {
    memo: SortMemo,
}

impl ViewComposer {
    /// Create a composer memoizing sorts in `memo`.
    pub fn new(memo: SortMemo) -> Self {
        Self { memo }
    }

    /// Drop memoized orders.
    pub fn clear_memo(&self) {
        self.memo.clear();
    }

    /// Compose the view.
    pub fn compose(&self, input: &ViewInput<'_>) -> Vec<ViewItem> {
        match input.search {
            SearchView::Overlay(outcome) => overlay_items(input, outcome),
            SearchView::Filter(term) => {
                let level = match input.scope {
                    Some(scope) => input.snapshot.children_of(scope),
                    None => input.snapshot.roots.as_ref(),
                };
                let Some(level) = level else {
                    return Vec::new();
                };
                let pass = Pass {
                    input,
                    term: term.trim(),
                    memo: &self.memo,
                    counts: RefCell::default(),
                };
                pass.level(level, input.scope, 0)
            }
        }
    }
}

/// Flat ranked list; relevance order is kept, the type filter still applies.
fn overlay_items(input: &ViewInput<'_>, outcome: Option<&SearchOutcome>) -> Vec<ViewItem> {
    let Some(outcome) = outcome else {
        return Vec::new();
    };
    outcome
        .results
        .iter()
        .filter(|hit| input.type_filter.matches(Some(hit.asset.kind)))
        .map(|hit| {
            let mut item = ViewItem::from_ranked(hit);
            item.is_selected = input.selected.contains(&item.id);
            if item.is_selected {
                item.selection = SelectionState::Full;
            }
            item
        })
        .collect()
}

/// One composition over the cached tree.
struct Pass<'i, 'a> {
    input: &'i ViewInput<'a>,
    term: &'i str,
    memo: &'i SortMemo,
    /// Per-node `(subtree size, selected in subtree)`, filled on demand.
    counts: RefCell<HashMap<NodeId, (usize, usize)>>,
}

impl Pass<'_, '_> {
    fn level(&self, level: &CachedLevel, parent: Option<&NodeId>, depth: usize) -> Vec<ViewItem> {
        if depth > MAX_DEPTH {
            return Vec::new();
        }
        let nodes = level.nodes.as_slice();
        let key = MemoKey {
            parent: parent.cloned(),
            version: level.version,
            sort: self.input.sort,
        };
        let order = self
            .memo
            .order_with(key, || sorted_order(nodes, &self.input.sort));

        order
            .iter()
            .filter_map(|&index| nodes.get(index))
            .filter(|node| self.keeps(node, depth))
            .map(|node| self.item(node, depth))
            .collect()
    }

    /// Recursive keep predicate over cached data, expanded or not.
    fn keeps(&self, node: &TreeNode, depth: usize) -> bool {
        let own_match = name_matches(&node.name, self.term);
        if !node.is_bundle() {
            return own_match && self.input.type_filter.matches(node.kind);
        }
        if own_match && self.input.type_filter.is_all() {
            return true;
        }
        if depth > MAX_DEPTH {
            return false;
        }
        // Uncached contents have no kept descendants.
        self.input
            .snapshot
            .children_of(&node.id)
            .is_some_and(|level| level.nodes.iter().any(|child| self.keeps(child, depth + 1)))
    }

    /// Size of `id`'s cached subtree (self included) and how much of it is
    /// selected. Each node is counted once per pass.
    fn subtree_counts(&self, id: &NodeId, depth: usize) -> (usize, usize) {
        if let Some(&counts) = self.counts.borrow().get(id) {
            return counts;
        }
        let mut total = 1;
        let mut hits = usize::from(self.input.selected.contains(id));
        if depth <= MAX_DEPTH {
            if let Some(level) = self.input.snapshot.children_of(id) {
                for child in level.nodes.iter() {
                    let (child_total, child_hits) = self.subtree_counts(&child.id, depth + 1);
                    total += child_total;
                    hits += child_hits;
                }
            }
        }
        self.counts.borrow_mut().insert(id.clone(), (total, hits));
        (total, hits)
    }

    fn item(&self, node: &TreeNode, depth: usize) -> ViewItem {
        let input = self.input;
        let mut item = ViewItem::from_node(node, depth);
        item.is_expanded = input.expanded.contains(&node.id);
        item.is_selected = input.selected.contains(&node.id);
        item.is_loading = input.snapshot.is_pending(&node.id);

        if let Some(level) = input.snapshot.children_of(&node.id) {
            item.has_more = level.has_more;
            item.total_children = Some(level.total);
        }

        item.selection = if node.is_bundle() {
            match self.subtree_counts(&node.id, depth) {
                (_, 0) => SelectionState::None,
                (total, hits) if hits == total => SelectionState::Full,
                _ => SelectionState::Partial,
            }
        } else if item.is_selected {
            SelectionState::Full
        } else {
            SelectionState::None
        };

        if item.is_expanded {
            if let Some(level) = input.snapshot.children_of(&node.id) {
                item.children = Some(self.level(level, Some(&node.id), depth + 1));
            }
        }
        item
    }
}
