//! Node lookup and free-edge adjacency.

use super::types::{FreeEdge, Node, NodeId};
use crate::error::{Result, RouteError};
use std::collections::HashMap;

/// Snapshot of nodes and free edges for one request.
///
/// Free edges that reference unknown nodes, or that loop back to their own
/// node, are ignored. Duplicate edges collapse into one.
#[derive(Debug, Clone)]
pub struct RouteGraph {
    nodes: Vec<Node>,
    slots: HashMap<NodeId, usize>,
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl RouteGraph {
    /// Builds the graph, rejecting duplicate node ids and non-finite positions.
    pub fn new(nodes: Vec<Node>, edges: &[FreeEdge]) -> Result<Self> {
        let mut slots = HashMap::with_capacity(nodes.len());
        for (slot, node) in nodes.iter().enumerate() {
            if !node.position.is_finite() {
                return Err(RouteError::invalid_request(format!(
                    "node {} has a non-finite position",
                    node.id
                )));
            }
            if slots.insert(node.id, slot).is_some() {
                return Err(RouteError::invalid_request(format!(
                    "duplicate node id {}",
                    node.id
                )));
            }
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];
        let mut skipped = 0usize;
        for edge in edges {
            match (slots.get(&edge.node_a), slots.get(&edge.node_b)) {
                (Some(&a), Some(&b)) if a != b => {
                    adjacency[a].push(b);
                    adjacency[b].push(a);
                }
                _ => skipped += 1,
            }
        }
        let mut edge_count = 0;
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
            edge_count += list.len();
        }
        if skipped > 0 {
            log::debug!("route graph: ignored {skipped} dangling or looping free edges");
        }

        Ok(Self {
            nodes,
            slots,
            adjacency,
            edge_count: edge_count / 2,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct free edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(&id).map(|&slot| &self.nodes[slot])
    }

    /// Nodes joined to `id` by a single free edge, in ascending id order.
    pub fn free_neighbours(&self, id: NodeId) -> Vec<NodeId> {
        let Some(&slot) = self.slots.get(&id) else {
            return Vec::new();
        };
        let mut ids: Vec<NodeId> = self.adjacency[slot]
            .iter()
            .map(|&other| self.nodes[other].id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Every node within `radius` canonical units of `center` (inclusive),
    /// the center itself included, in ascending id order.
    pub fn within_radius(&self, center: NodeId, radius: f64) -> Vec<NodeId> {
        let Some(origin) = self.node(center) else {
            return Vec::new();
        };
        let mut ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| n.position.distance(&origin.position) <= radius)
            .map(|n| n.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Members of a group, in ascending id order.
    pub fn group_members(&self, group: u64) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| n.group == Some(group))
            .map(|n| n.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// All node ids, in ascending order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.iter().map(|n| n.id).collect();
        ids.sort_unstable();
        ids
    }
}
