//! Reduced cost index.
//!
//! Collapses the free-edge graph and the continuous hop metric into one
//! symmetric pairwise table over a request's node set. Search code only
//! ever asks "what does it cost to go from a to b?" and never needs to know
//! whether the answer came from a gate chain or a direct jump.
//!
//! # Resolution rule
//!
//! For every pair `(a, b)`:
//!
//! 1. free-path cost = `FREE_EDGE_COST` x (fewest free edges from a to b),
//!    walking only through nodes of the request;
//! 2. hop cost = Euclidean distance, feasible iff `<= max_hop_distance`;
//! 3. resolved cost = the smaller of the two, free on ties; disconnected
//!    when neither exists.

mod index;
mod types;

pub use index::{PrunedIndex, ReducedCostIndex};
pub use types::{CostEdge, LegKind, FREE_EDGE_COST};
