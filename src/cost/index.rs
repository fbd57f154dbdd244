//! Pairwise cost table construction and reachability pruning.

use super::types::{CostEdge, LegKind};
use crate::error::{Result, RouteError};
use crate::graph::{NodeId, RouteGraph};
use crate::distance::Position;
use std::collections::{HashMap, VecDeque};

/// Symmetric pairwise cost table over one request's node set.
///
/// Nodes are addressed by *slot*: slots are dense, start at zero and follow
/// ascending node id, so "lowest slot" and "lowest node id" agree.
#[derive(Debug, Clone)]
pub struct ReducedCostIndex {
    ids: Vec<NodeId>,
    slots: HashMap<NodeId, usize>,
    /// Row-major `n x n`; `f64::INFINITY` marks a disconnected pair.
    costs: Vec<f64>,
    edges: Vec<Option<CostEdge>>,
    max_hop_distance: f64,
}

/// Result of dropping unreachable nodes from an index.
#[derive(Debug, Clone)]
pub struct PrunedIndex {
    pub index: ReducedCostIndex,
    /// Excluded node ids, ascending.
    pub excluded: Vec<NodeId>,
}

impl ReducedCostIndex {
    /// Builds the table for `selection` (duplicates ignored).
    ///
    /// Fails with `InvalidRequest` if the selection is empty, names a node
    /// missing from `graph`, or `max_hop_distance` is not positive.
    pub fn build(graph: &RouteGraph, selection: &[NodeId], max_hop_distance: f64) -> Result<Self> {
        if !(max_hop_distance.is_finite() && max_hop_distance > 0.0) {
            return Err(RouteError::invalid_request(format!(
                "max hop distance must be positive and finite, got {max_hop_distance}"
            )));
        }
        let mut ids = selection.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Err(RouteError::invalid_request("node selection is empty"));
        }

        let mut positions: Vec<Position> = Vec::with_capacity(ids.len());
        for &id in &ids {
            let node = graph
                .node(id)
                .ok_or_else(|| RouteError::invalid_request(format!("unknown node id {id}")))?;
            positions.push(node.position);
        }
        let slots: HashMap<NodeId, usize> =
            ids.iter().enumerate().map(|(slot, &id)| (id, slot)).collect();

        // Free adjacency restricted to the selection.
        let adjacency: Vec<Vec<usize>> = ids
            .iter()
            .map(|&id| {
                graph
                    .free_neighbours(id)
                    .into_iter()
                    .filter_map(|other| slots.get(&other).copied())
                    .collect()
            })
            .collect();

        let n = ids.len();
        let mut costs = vec![f64::INFINITY; n * n];
        let mut edges: Vec<Option<CostEdge>> = vec![None; n * n];
        let mut jumps = vec![u32::MAX; n];
        let mut queue = VecDeque::new();

        for a in 0..n {
            costs[a * n + a] = 0.0;
            free_jumps_from(a, &adjacency, &mut jumps, &mut queue);

            for b in a + 1..n {
                let free = (jumps[b] != u32::MAX).then(|| CostEdge::free(jumps[b]));
                let distance = positions[a].distance(&positions[b]);
                let hop = (distance <= max_hop_distance).then(|| CostEdge::hop(distance));

                let resolved = match (free, hop) {
                    (Some(f), Some(h)) => Some(if f.cost <= h.cost { f } else { h }),
                    (Some(f), None) => Some(f),
                    (None, Some(h)) => Some(h),
                    (None, None) => None,
                };
                if let Some(edge) = resolved {
                    costs[a * n + b] = edge.cost;
                    costs[b * n + a] = edge.cost;
                    edges[a * n + b] = Some(edge);
                    edges[b * n + a] = Some(edge);
                }
            }
        }

        Ok(Self {
            ids,
            slots,
            costs,
            edges,
            max_hop_distance,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn max_hop_distance(&self) -> f64 {
        self.max_hop_distance
    }

    /// Node ids by slot.
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn node_id(&self, slot: usize) -> NodeId {
        self.ids[slot]
    }

    pub fn slot_of(&self, id: NodeId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    /// Resolved cost between two slots; `f64::INFINITY` when disconnected.
    #[inline]
    pub fn cost(&self, a: usize, b: usize) -> f64 {
        self.costs[a * self.ids.len() + b]
    }

    #[inline]
    pub fn edge(&self, a: usize, b: usize) -> Option<CostEdge> {
        self.edges[a * self.ids.len() + b]
    }

    #[inline]
    pub fn is_connected(&self, a: usize, b: usize) -> bool {
        self.cost(a, b).is_finite()
    }

    pub fn kind(&self, a: usize, b: usize) -> Option<LegKind> {
        self.edge(a, b).map(|e| e.kind)
    }

    /// Number of other slots `slot` has a resolved cost to.
    pub fn degree(&self, slot: usize) -> usize {
        (0..self.len())
            .filter(|&other| other != slot && self.is_connected(slot, other))
            .count()
    }

    /// Drops every node outside the component that will carry the tour.
    ///
    /// The anchor is `start` (or `end` when only that is pinned); with no
    /// pinned endpoint the largest component is kept, ties going to the one
    /// holding the lowest node id. A pinned anchor is never excluded.
    pub fn prune_unreachable(
        self,
        start: Option<NodeId>,
        end: Option<NodeId>,
    ) -> Result<PrunedIndex> {
        let resolve = |id: NodeId| {
            self.slot_of(id).ok_or_else(|| {
                RouteError::invalid_request(format!("endpoint {id} is not in the selection"))
            })
        };
        let start_slot = start.map(resolve).transpose()?;
        let end_slot = end.map(resolve).transpose()?;

        let (labels, sizes) = self.components();

        let keep = match (start_slot, end_slot) {
            (Some(s), Some(e)) => {
                if labels[s] != labels[e] {
                    return Err(RouteError::EndpointUnreachable {
                        start: self.ids[s],
                        end: self.ids[e],
                    });
                }
                labels[s]
            }
            (Some(anchor), None) | (None, Some(anchor)) => labels[anchor],
            (None, None) => {
                if self.len() > 1 && sizes.iter().all(|&size| size == 1) {
                    return Err(RouteError::AllNodesUnreachable);
                }
                // Labels are assigned in slot order, so the first maximum
                // holds the lowest node id.
                let mut best = 0;
                for (label, &size) in sizes.iter().enumerate() {
                    if size > sizes[best] {
                        best = label;
                    }
                }
                best
            }
        };

        if sizes[keep] == self.len() {
            return Ok(PrunedIndex {
                index: self,
                excluded: Vec::new(),
            });
        }

        let kept: Vec<usize> = (0..self.len()).filter(|&s| labels[s] == keep).collect();
        let excluded: Vec<NodeId> = (0..self.len())
            .filter(|&s| labels[s] != keep)
            .map(|s| self.ids[s])
            .collect();
        log::debug!(
            "cost index: kept {} of {} nodes, excluded {:?}",
            kept.len(),
            self.len(),
            excluded
        );
        Ok(PrunedIndex {
            index: self.restricted(&kept),
            excluded,
        })
    }

    /// A new index over a subset of slots (given in ascending order).
    pub fn restricted(&self, keep: &[usize]) -> Self {
        let n = self.len();
        let m = keep.len();
        let ids: Vec<NodeId> = keep.iter().map(|&s| self.ids[s]).collect();
        let slots = ids.iter().enumerate().map(|(slot, &id)| (id, slot)).collect();
        let mut costs = Vec::with_capacity(m * m);
        let mut edges = Vec::with_capacity(m * m);
        for &a in keep {
            for &b in keep {
                costs.push(self.costs[a * n + b]);
                edges.push(self.edges[a * n + b]);
            }
        }
        Self {
            ids,
            slots,
            costs,
            edges,
            max_hop_distance: self.max_hop_distance,
        }
    }

    /// Connected components of the resolved-cost graph.
    ///
    /// Returns a label per slot and the size of each label.
    fn components(&self) -> (Vec<usize>, Vec<usize>) {
        let n = self.len();
        let mut labels = vec![usize::MAX; n];
        let mut sizes = Vec::new();
        let mut stack = Vec::new();
        for root in 0..n {
            if labels[root] != usize::MAX {
                continue;
            }
            let label = sizes.len();
            let mut size = 0;
            labels[root] = label;
            stack.push(root);
            while let Some(a) = stack.pop() {
                size += 1;
                for b in 0..n {
                    if labels[b] == usize::MAX && self.is_connected(a, b) {
                        labels[b] = label;
                        stack.push(b);
                    }
                }
            }
            sizes.push(size);
        }
        (labels, sizes)
    }
}

/// Breadth-first free-edge distances (in edges) from `source`.
fn free_jumps_from(
    source: usize,
    adjacency: &[Vec<usize>],
    jumps: &mut [u32],
    queue: &mut VecDeque<usize>,
) {
    jumps.fill(u32::MAX);
    jumps[source] = 0;
    queue.clear();
    queue.push_back(source);
    while let Some(a) = queue.pop_front() {
        let next = jumps[a] + 1;
        for &b in &adjacency[a] {
            if jumps[b] == u32::MAX {
                jumps[b] = next;
                queue.push_back(b);
            }
        }
    }
}
