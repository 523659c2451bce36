//! Per-level ordering of cached nodes.

use std::cmp::Ordering;

use assethub_core::types::{SortDirection, SortField, SortKey, SortOption};
use assethub_entity::node::TreeNode;

/// Compare two siblings under `sort`.
///
/// Bundles always precede assets. Remaining ties fall back to the
/// case-insensitive name, ascending.
pub fn compare_nodes(a: &TreeNode, b: &TreeNode, sort: &SortOption) -> Ordering {
    b.is_bundle()
        .cmp(&a.is_bundle())
        .then_with(|| compare_field(a, b, &sort.primary))
        .then_with(|| match &sort.secondary {
            Some(field) => compare_field(a, b, field),
            None => Ordering::Equal,
        })
        .then_with(|| folded_name(a).cmp(&folded_name(b)))
}

fn compare_field(a: &TreeNode, b: &TreeNode, field: &SortField) -> Ordering {
    let ordering = match field.key {
        SortKey::Name => folded_name(a).cmp(&folded_name(b)),
        SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::Kind => kind_name(a).cmp(kind_name(b)),
    };
    match field.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn folded_name(node: &TreeNode) -> String {
    node.name.to_lowercase()
}

fn kind_name(node: &TreeNode) -> &'static str {
    node.kind.map(|kind| kind.as_str()).unwrap_or("")
}

/// Stable sorted permutation of `nodes`.
pub fn sorted_order(nodes: &[TreeNode], sort: &SortOption) -> Vec<usize> {
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| compare_nodes(&nodes[a], &nodes[b], sort));
    order
}
