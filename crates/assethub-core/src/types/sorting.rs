//! Sorting types for the tree view.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Asc
    }
}

/// Field a tree level can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Display name, case-insensitive.
    Name,
    /// Last modification time.
    UpdatedAt,
    /// Creation time.
    CreatedAt,
    /// Asset kind (bundles have none).
    Kind,
}

/// One sort key with its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortField {
    /// Field to sort by.
    pub key: SortKey,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortField {
    /// Create a new sort field.
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Create an ascending sort on the given key.
    pub fn asc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    /// Create a descending sort on the given key.
    pub fn desc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Desc)
    }
}

/// Single or compound (two-key) ordering applied at every tree level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOption {
    /// Primary key.
    pub primary: SortField,
    /// Optional tie-breaker applied before the name fallback.
    #[serde(default)]
    pub secondary: Option<SortField>,
}

impl SortOption {
    /// Order by a single key.
    pub fn single(field: SortField) -> Self {
        Self {
            primary: field,
            secondary: None,
        }
    }

    /// Order by two keys.
    pub fn compound(primary: SortField, secondary: SortField) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }
}

impl Default for SortOption {
    fn default() -> Self {
        Self::single(SortField::desc(SortKey::UpdatedAt))
    }
}
