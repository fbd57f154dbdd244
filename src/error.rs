//! Error taxonomy for route requests.

use crate::graph::NodeId;
use thiserror::Error as ThisError;

/// Errors a route request can end in.
///
/// Cancellation is deliberately absent: it is reported as its own response
/// status, not as a failure.
#[derive(Debug, ThisError)]
pub enum RouteError {
    /// Malformed selection, empty node set, or an invalid configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Every selected node was isolated from all the others.
    #[error("all selected nodes are unreachable from one another")]
    AllNodesUnreachable,

    /// A fixed end node lies outside the component of the fixed start.
    #[error("end node {end} is unreachable from start node {start}")]
    EndpointUnreachable { start: NodeId, end: NodeId },

    /// A single refinement pass faulted. Contained by the coordinator.
    #[error("refinement pass {pass} failed: {message}")]
    PassFailure { pass: usize, message: String },

    /// The worker pool could not be started.
    #[error("worker pool: {0}")]
    WorkerPool(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RouteError>;

impl RouteError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Stable identifier used as `errorKind` in response messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RouteError::InvalidRequest(_) => "invalid-request",
            RouteError::AllNodesUnreachable => "all-nodes-unreachable",
            RouteError::EndpointUnreachable { .. } => "endpoint-unreachable",
            RouteError::PassFailure { .. } => "pass-failure",
            RouteError::WorkerPool(_) => "worker-pool",
            RouteError::Json(_) => "malformed-message",
        }
    }
}
