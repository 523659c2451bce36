//! Typed identifiers for tree nodes and workspaces.
//!
//! Node ids arrive from the server as opaque strings namespaced by kind
//! (`"asset-12"`, `"bundle-3"`). [`NodeId`] keeps the string form for
//! hashing and display and offers [`NodeId::parse`] for the rare callers
//! that need the numeric part.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Whether a tree entry is an asset or a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// A content item (document, image, article, ...).
    Asset,
    /// A named container of assets and nested bundles.
    Bundle,
}

impl NodeType {
    /// The id namespace prefix for this node type.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Bundle => "bundle",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Identifier of a single tree entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap a raw id string without validating it.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Id of the asset with the given numeric id.
    pub fn asset(id: i64) -> Self {
        Self(format!("asset-{id}"))
    }

    /// Id of the bundle with the given numeric id.
    pub fn bundle(id: i64) -> Self {
        Self(format!("bundle-{id}"))
    }

    /// The raw string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the id into its node type and numeric id.
    pub fn parse(&self) -> Result<(NodeType, i64), AppError> {
        let (prefix, number) = self.0.split_once('-').ok_or_else(|| {
            AppError::validation(format!("Invalid tree node ID format '{}'", self.0))
        })?;

        let node_type = match prefix {
            "asset" => NodeType::Asset,
            "bundle" => NodeType::Bundle,
            other => {
                return Err(AppError::validation(format!(
                    "Invalid node type '{other}' in '{}'",
                    self.0
                )));
            }
        };

        let numeric = number.parse::<i64>().map_err(|e| {
            AppError::validation(format!("Invalid tree node ID format '{}': {e}", self.0))
        })?;

        Ok((node_type, numeric))
    }

    /// The node type encoded in the id prefix, if well formed.
    pub fn node_type(&self) -> Option<NodeType> {
        self.parse().ok().map(|(node_type, _)| node_type)
    }

    /// Whether the id names a bundle.
    pub fn is_bundle(&self) -> bool {
        self.0.starts_with("bundle-")
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodeId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Self(s.to_string());
        id.parse()?;
        Ok(id)
    }
}

impl From<&str> for NodeId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Identifier of the active workspace (infospace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(pub i64);

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
