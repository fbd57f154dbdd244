//! Leg kinds and resolved pair costs.

use serde::{Deserialize, Serialize};

/// Cost of traversing one free edge, in canonical units.
///
/// Small enough to undercut any realistic hop, non-zero so that a tour with
/// fewer gate jumps still wins a tie. A power of two, so multiples are exact.
pub const FREE_EDGE_COST: f64 = 1.0 / 1024.0;

/// How a leg between two tour-adjacent nodes is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegKind {
    /// Along one or more free edges.
    Free,
    /// A direct jump through continuous space.
    Hop,
}

/// The resolved traversal between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEdge {
    pub kind: LegKind,
    /// Non-negative cost in canonical units.
    pub cost: f64,
    /// Free edges traversed; zero for hops.
    pub jumps: u32,
}

impl CostEdge {
    pub fn free(jumps: u32) -> Self {
        Self {
            kind: LegKind::Free,
            cost: FREE_EDGE_COST * jumps as f64,
            jumps,
        }
    }

    pub fn hop(distance: f64) -> Self {
        Self {
            kind: LegKind::Hop,
            cost: distance,
            jumps: 0,
        }
    }

    pub fn is_free(&self) -> bool {
        self.kind == LegKind::Free
    }
}
