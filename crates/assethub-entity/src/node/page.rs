//! Paged children listings.

use serde::{Deserialize, Serialize};

use super::model::TreeNode;

/// Default number of children per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Largest page the tree API serves.
pub const MAX_PAGE_SIZE: usize = 500;

/// Window into a parent's children list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Children to skip.
    pub skip: usize,
    /// Maximum children to return, between 1 and [`MAX_PAGE_SIZE`].
    pub limit: usize,
}

impl PageRequest {
    /// Window starting at `skip`; `limit` is clamped to the served range.
    pub fn new(skip: usize, limit: usize) -> Self {
        Self {
            skip,
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// The first page.
    pub fn first(limit: usize) -> Self {
        Self::new(0, limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// One page of a parent's direct children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildrenPage {
    /// Children in server order.
    pub children: Vec<TreeNode>,
    /// Size of the whole children list.
    pub total_children: usize,
    /// Whether children remain past this page.
    pub has_more: bool,
}

impl ChildrenPage {
    /// A page holding the whole list.
    pub fn complete(children: Vec<TreeNode>) -> Self {
        Self {
            total_children: children.len(),
            has_more: false,
            children,
        }
    }

    /// Cut the window `page` out of the full list `all`.
    pub fn slice(all: Vec<TreeNode>, page: PageRequest) -> Self {
        let total_children = all.len();
        let children: Vec<TreeNode> = all.into_iter().skip(page.skip).take(page.limit).collect();
        Self {
            has_more: page.skip + children.len() < total_children,
            total_children,
            children,
        }
    }
}
