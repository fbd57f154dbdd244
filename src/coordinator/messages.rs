//! Coordinator <-> worker messages.

use crate::sa::SaConfig;
use crate::tour::{SearchSpace, Tour};
use std::sync::Arc;

/// Identifies one pass of one coordinator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId {
    /// Base seed of the run the pass belongs to.
    pub run: u64,
    /// Pass index within the run.
    pub pass: usize,
}

/// Work order for a single refinement pass.
#[derive(Debug, Clone)]
pub struct PassRequest {
    pub correlation: CorrelationId,
    pub space: Arc<SearchSpace>,
    /// Starting tour, as slots.
    pub start: Arc<Vec<usize>>,
    pub config: SaConfig,
    pub seed: u64,
}

/// Best tour found by one pass.
#[derive(Debug, Clone)]
pub struct Champion {
    pub pass: usize,
    pub tour: Tour,
    /// Cost of the tour the pass started from.
    pub start_cost: f64,
    pub accepted_moves: usize,
    pub improving_moves: usize,
}

/// A worker's answer to a [`PassRequest`].
#[derive(Debug)]
pub struct PassResponse {
    pub correlation: CorrelationId,
    pub outcome: Result<Champion, String>,
}

/// Seed for pass `pass` of a run with base seed `base`.
///
/// Decorrelates neighbouring pass indices so that passes explore
/// independently, while staying a pure function of its inputs.
pub fn derive_pass_seed(base: u64, pass: usize) -> u64 {
    splitmix64(base ^ splitmix64(pass as u64))
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
