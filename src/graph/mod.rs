//! In-memory location graph.
//!
//! A [`RouteGraph`] is a per-request snapshot of nodes (locations) and the
//! free edges (stargate links) between them. It is built from data handed
//! over by an external data source and dropped when the request ends.

mod route_graph;
mod types;

pub use route_graph::RouteGraph;
pub use types::{FreeEdge, Node, NodeId};
