//! Itinerary optimization over sparse free-edge networks.
//!
//! Given nodes in 3D space, a set of free edges between some of them (gate
//! links that cost almost nothing to traverse) and a ceiling on direct hop
//! length, find a short tour through a selected node set.
//!
//! # Pipeline
//!
//! 1. [`graph::RouteGraph`] holds the request's nodes and free edges.
//! 2. [`cost::ReducedCostIndex`] resolves every pair to a free path, a
//!    direct hop, or nothing, and drops nodes that cannot be reached.
//! 3. [`baseline::BaselineBuilder`] builds a feasible tour greedily and
//!    polishes it with 2-opt and relocation moves.
//! 4. [`coordinator::PassCoordinator`] runs independent simulated-annealing
//!    passes ([`sa`]) from the baseline on a bounded worker pool.
//! 5. [`aggregate::ResultAggregator`] keeps the best tour and
//!    [`aggregate::RouteExporter`] renders it.
//!
//! [`Optimizer`] wires the stages together behind the message types of
//! [`protocol`].
//!
//! # Determinism
//!
//! Every random decision flows from an explicit seed. With
//! [`config::RunConfig::seed`] set, two runs on the same input produce the
//! same [`aggregate::RouteResult`], whatever the worker count.

pub mod aggregate;
pub mod baseline;
pub mod config;
pub mod coordinator;
pub mod cost;
pub mod distance;
pub mod error;
pub mod graph;
pub mod logging;
pub mod optimizer;
pub mod protocol;
pub mod sa;
pub mod tour;

pub use error::{Result, RouteError};
pub use optimizer::{Optimizer, RouteJob};
