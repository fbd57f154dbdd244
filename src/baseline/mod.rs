//! Baseline tour construction.
//!
//! Greedy nearest-neighbour construction followed by bounded first-improvement
//! local search (2-opt reversals and single-node relocations). Cheap,
//! deterministic, and the seed every refinement pass starts from.
//!
//! # References
//!
//! - Rosenkrantz, Stearns & Lewis (1977), "An Analysis of Several Heuristics
//!   for the Traveling Salesman Problem"
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems"
//! - Or (1976), segment relocation for routing problems

mod builder;
mod config;

pub use builder::{Baseline, BaselineBuilder};
pub use config::BaselineConfig;
