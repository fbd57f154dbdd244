//! Which nodes a request routes through.

use crate::error::{Result, RouteError};
use crate::graph::{NodeId, RouteGraph};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// Fixed start and end, every other candidate in between.
    PointToPoint,
    /// Visit an arbitrary node set; the start may be left free.
    CoverSet,
    /// Every node within `radiusDistance` of `radiusCenter`.
    Radius,
}

/// The selection part of a request.
///
/// For point-to-point and cover-set the candidate set is `nodeIds` when
/// given, otherwise every node of the request; `group` narrows it further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub mode: SelectionMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_center: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_ids: Option<Vec<NodeId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<u64>,
}

/// A selection checked against the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSelection {
    /// Ascending, no duplicates, endpoints included.
    pub node_ids: Vec<NodeId>,
    pub start: Option<NodeId>,
    pub end: Option<NodeId>,
}

impl Selection {
    fn empty(mode: SelectionMode) -> Self {
        Self {
            mode,
            start: None,
            end: None,
            radius_center: None,
            radius_distance: None,
            node_ids: None,
            group: None,
        }
    }

    pub fn point_to_point(start: NodeId, end: NodeId) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::empty(SelectionMode::PointToPoint)
        }
    }

    pub fn cover_set() -> Self {
        Self::empty(SelectionMode::CoverSet)
    }

    pub fn radius(center: NodeId, distance: f64) -> Self {
        Self {
            radius_center: Some(center),
            radius_distance: Some(distance),
            ..Self::empty(SelectionMode::Radius)
        }
    }

    pub fn with_start(mut self, start: NodeId) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: NodeId) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_node_ids(mut self, ids: Vec<NodeId>) -> Self {
        self.node_ids = Some(ids);
        self
    }

    pub fn with_group(mut self, group: u64) -> Self {
        self.group = Some(group);
        self
    }

    /// Resolves the node set and pins against `graph`.
    pub fn resolve(&self, graph: &RouteGraph) -> Result<ResolvedSelection> {
        let known = |id: NodeId, role: &str| {
            if graph.contains(id) {
                Ok(id)
            } else {
                Err(RouteError::invalid_request(format!(
                    "{role} node {id} is not among the request nodes"
                )))
            }
        };

        let (mut ids, start) = match self.mode {
            SelectionMode::PointToPoint => {
                let (Some(start), Some(_)) = (self.start, self.end) else {
                    return Err(RouteError::invalid_request(
                        "point-to-point needs both start and end",
                    ));
                };
                (self.candidates(graph)?, Some(known(start, "start")?))
            }
            SelectionMode::CoverSet => {
                let start = self.start.map(|id| known(id, "start")).transpose()?;
                (self.candidates(graph)?, start)
            }
            SelectionMode::Radius => {
                let (Some(center), Some(distance)) = (self.radius_center, self.radius_distance)
                else {
                    return Err(RouteError::invalid_request(
                        "radius needs radiusCenter and radiusDistance",
                    ));
                };
                if !(distance.is_finite() && distance >= 0.0) {
                    return Err(RouteError::invalid_request(format!(
                        "radiusDistance must be non-negative and finite, got {distance}"
                    )));
                }
                let center = known(center, "radius center")?;
                let mut ids: BTreeSet<NodeId> =
                    graph.within_radius(center, distance).into_iter().collect();
                if let Some(group) = self.group {
                    ids.retain(|&id| {
                        id == center || graph.node(id).and_then(|n| n.group) == Some(group)
                    });
                }
                let start = self.start.unwrap_or(center);
                for pin in std::iter::once(start).chain(self.end) {
                    if !ids.contains(&pin) {
                        return Err(RouteError::invalid_request(format!(
                            "node {pin} lies outside the selected radius"
                        )));
                    }
                }
                (ids, Some(start))
            }
        };

        let end = self.end.map(|id| known(id, "end")).transpose()?;
        ids.extend(start);
        ids.extend(end);
        if ids.is_empty() {
            return Err(RouteError::invalid_request("selection matched no nodes"));
        }
        Ok(ResolvedSelection {
            node_ids: ids.into_iter().collect(),
            start,
            end,
        })
    }

    fn candidates(&self, graph: &RouteGraph) -> Result<BTreeSet<NodeId>> {
        let mut ids: BTreeSet<NodeId> = match &self.node_ids {
            Some(list) => {
                if let Some(missing) = list.iter().find(|&&id| !graph.contains(id)) {
                    return Err(RouteError::invalid_request(format!(
                        "selected node {missing} is not among the request nodes"
                    )));
                }
                list.iter().copied().collect()
            }
            None => match self.group {
                Some(group) => return Ok(graph.group_members(group).into_iter().collect()),
                None => graph.node_ids().into_iter().collect(),
            },
        };
        if let Some(group) = self.group {
            ids.retain(|&id| graph.node(id).and_then(|n| n.group) == Some(group));
        }
        Ok(ids)
    }
}
