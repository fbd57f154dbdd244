//! Node and edge records.

use crate::distance::Position;
use serde::{Deserialize, Serialize};

/// Unique identity of a node.
pub type NodeId = u64;

/// A location. Immutable for the lifetime of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    pub position: Position,
    /// Region or constellation the node belongs to, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<u64>,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            group: None,
        }
    }

    pub fn with_group(mut self, group: u64) -> Self {
        self.group = Some(group);
        self
    }
}

/// A bidirectional zero-cost connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeEdge {
    pub node_a: NodeId,
    pub node_b: NodeId,
}

impl FreeEdge {
    pub fn new(node_a: NodeId, node_b: NodeId) -> Self {
        Self { node_a, node_b }
    }
}
