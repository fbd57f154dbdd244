//! Deterministic best-of selection.

use crate::coordinator::Champion;
use crate::tour::{SearchSpace, Tour};
use std::cmp::Ordering;

/// A tour competing for the final result.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Pass that found the tour; `None` for the baseline.
    pub pass: Option<usize>,
    pub tour: Tour,
}

impl Candidate {
    pub fn baseline(tour: Tour) -> Self {
        Self { pass: None, tour }
    }
}

impl From<Champion> for Candidate {
    fn from(champion: Champion) -> Self {
        Self {
            pass: Some(champion.pass),
            tour: champion.tour,
        }
    }
}

/// Chooses the reported tour.
pub struct ResultAggregator;

impl ResultAggregator {
    /// Lowest cost wins; ties go to fewer hop legs, then to the earliest
    /// discovery (baseline before pass 0 before pass 1, ...).
    ///
    /// Arrival order of `champions` does not matter.
    pub fn select(
        space: &SearchSpace,
        baseline: Tour,
        champions: impl IntoIterator<Item = Champion>,
    ) -> Candidate {
        champions
            .into_iter()
            .map(Candidate::from)
            .fold(Candidate::baseline(baseline), |best, next| {
                if Self::compare(space, &next, &best) == Ordering::Less {
                    next
                } else {
                    best
                }
            })
    }

    /// Total order used by [`select`](Self::select). `Less` means `a` is preferred.
    pub fn compare(space: &SearchSpace, a: &Candidate, b: &Candidate) -> Ordering {
        a.tour
            .cost()
            .total_cmp(&b.tour.cost())
            .then_with(|| {
                space
                    .hop_count(a.tour.order())
                    .cmp(&space.hop_count(b.tour.order()))
            })
            .then_with(|| discovery_rank(a).cmp(&discovery_rank(b)))
    }
}

fn discovery_rank(candidate: &Candidate) -> usize {
    candidate.pass.map_or(0, |p| p + 1)
}
