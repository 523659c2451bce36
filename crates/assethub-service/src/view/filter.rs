//! Type filter and name matching for the local recursive filter.

use serde::{Deserialize, Serialize};

use assethub_entity::node::AssetKind;

/// Which asset kinds the view shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "kinds", rename_all = "snake_case")]
pub enum TypeFilter {
    /// Every kind.
    #[default]
    All,
    /// Only assets of these kinds.
    Kinds(Vec<AssetKind>),
}

impl TypeFilter {
    /// Filter on a single kind.
    pub fn only(kind: AssetKind) -> Self {
        Self::Kinds(vec![kind])
    }

    /// Whether the filter lets everything through.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether an asset of `kind` passes. Kindless nodes only pass `All`.
    pub fn matches(&self, kind: Option<AssetKind>) -> bool {
        match self {
            Self::All => true,
            Self::Kinds(kinds) => kind.is_some_and(|kind| kinds.contains(&kind)),
        }
    }

    /// Kinds to forward to the search collaborators.
    pub fn kinds(&self) -> Option<Vec<AssetKind>> {
        match self {
            Self::All => None,
            Self::Kinds(kinds) => Some(kinds.clone()),
        }
    }
}

/// Case-insensitive substring match; an empty term matches everything.
pub fn name_matches(name: &str, term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || name.to_lowercase().contains(&term.to_lowercase())
}
