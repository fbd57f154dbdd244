//! Rendering the chosen tour into the caller-facing result.

use super::aggregator::Candidate;
use crate::cost::LegKind;
use crate::distance::DistanceModel;
use crate::graph::NodeId;
use crate::tour::SearchSpace;
use serde::{Deserialize, Serialize};

/// One traversal between consecutive tour nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: LegKind,
    /// Canonical units.
    pub cost: f64,
    /// Free edges walked by a free leg; zero for hops.
    pub jumps: u32,
}

/// Final answer of a route request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub ordered_node_ids: Vec<NodeId>,
    pub total_cost_canonical: f64,
    pub total_cost_display_units: f64,
    pub hop_edge_count: usize,
    pub free_edge_count: usize,
    pub excluded_unreachable_node_ids: Vec<NodeId>,
    /// Connected to the route, but no feasible position was found for them.
    #[serde(default)]
    pub excluded_unplaceable_node_ids: Vec<NodeId>,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
    #[serde(default)]
    pub round_trip: bool,
    /// Pass whose champion was reported; absent when the baseline won.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_pass: Option<usize>,
}

/// Converts a selected [`Candidate`] into a [`RouteResult`].
#[derive(Debug, Clone, Default)]
pub struct RouteExporter {
    model: DistanceModel,
}

impl RouteExporter {
    pub fn new(model: DistanceModel) -> Self {
        Self { model }
    }

    /// `unreachable` and `unplaceable` are carried into the result as given.
    pub fn export(
        &self,
        space: &SearchSpace,
        chosen: &Candidate,
        unreachable: Vec<NodeId>,
        unplaceable: Vec<NodeId>,
    ) -> RouteResult {
        let index = space.index();
        let order = chosen.tour.order();

        let legs: Vec<RouteLeg> = space
            .legs(order)
            .filter_map(|(a, b)| {
                index.edge(a, b).map(|edge| RouteLeg {
                    from: index.node_id(a),
                    to: index.node_id(b),
                    kind: edge.kind,
                    cost: edge.cost,
                    jumps: edge.jumps,
                })
            })
            .collect();
        let hop_edge_count = legs.iter().filter(|l| l.kind == LegKind::Hop).count();
        let free_edge_count = legs.len() - hop_edge_count;
        let total = chosen.tour.cost();

        RouteResult {
            ordered_node_ids: order.iter().map(|&slot| index.node_id(slot)).collect(),
            total_cost_canonical: total,
            total_cost_display_units: self.model.to_display(total),
            hop_edge_count,
            free_edge_count,
            excluded_unreachable_node_ids: unreachable,
            excluded_unplaceable_node_ids: unplaceable,
            legs,
            round_trip: space.is_closed(),
            selected_pass: chosen.pass,
        }
    }
}
