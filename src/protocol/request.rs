//! Inbound request message.

use super::selection::Selection;
use crate::config::RunConfig;
use crate::distance::DistanceModel;
use crate::error::{Result, RouteError};
use crate::graph::{FreeEdge, Node, RouteGraph};
use serde::{Deserialize, Serialize};

/// Unit system of the positions in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionUnits {
    #[default]
    Canonical,
    /// Data-source units; scaled down by the [`DistanceModel`] on ingestion.
    Raw,
}

/// A route request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequestMessage {
    /// Opaque token echoed back in the response.
    #[serde(default)]
    pub correlation_id: String,
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub free_edges: Vec<FreeEdge>,
    pub selection: Selection,
    #[serde(default)]
    pub config: RunConfig,
    #[serde(default)]
    pub position_units: PositionUnits,
}

impl RouteRequestMessage {
    pub fn new(nodes: Vec<Node>, free_edges: Vec<FreeEdge>, selection: Selection) -> Self {
        Self {
            correlation_id: String::new(),
            nodes,
            free_edges,
            selection,
            config: RunConfig::default(),
            position_units: PositionUnits::Canonical,
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = id.into();
        self
    }

    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_position_units(mut self, units: PositionUnits) -> Self {
        self.position_units = units;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Checks everything that can be checked without building the graph.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(RouteError::invalid_request("no nodes supplied"));
        }
        self.config.validate().map_err(RouteError::InvalidRequest)
    }

    /// The request's graph, in canonical units.
    pub fn graph(&self, model: &DistanceModel) -> Result<RouteGraph> {
        let nodes = match self.position_units {
            PositionUnits::Canonical => self.nodes.clone(),
            PositionUnits::Raw => self
                .nodes
                .iter()
                .map(|node| Node {
                    position: model.position_from_raw(node.position),
                    ..node.clone()
                })
                .collect(),
        };
        RouteGraph::new(nodes, &self.free_edges)
    }
}
