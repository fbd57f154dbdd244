//! Cost evaluation and move deltas over a pinned tour.

use super::moves::TourMove;
use super::types::Tour;
use crate::cost::{LegKind, ReducedCostIndex};
use crate::error::{Result, RouteError};
use crate::graph::NodeId;
use crate::sa::AnnealingProblem;
use rand::Rng;

/// A cost index plus the pinning rules of one request.
///
/// - a pinned start always sits at position 0;
/// - a pinned end always sits at the last position;
/// - a closed tour (round trip) adds a leg from the last node back to the
///   first and always pins position 0.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    index: ReducedCostIndex,
    start: Option<usize>,
    end: Option<usize>,
    closed: bool,
}

impl SearchSpace {
    pub fn new(
        index: ReducedCostIndex,
        start: Option<NodeId>,
        end: Option<NodeId>,
        closed: bool,
    ) -> Result<Self> {
        let slot = |id: NodeId| {
            index.slot_of(id).ok_or_else(|| {
                RouteError::invalid_request(format!("endpoint {id} is not in the selection"))
            })
        };
        let start = start.map(slot).transpose()?;
        let end = end.map(slot).transpose()?;
        if closed && end.is_some() {
            return Err(RouteError::invalid_request(
                "a round trip cannot have a fixed end node",
            ));
        }
        if start.is_some() && start == end && index.len() > 1 {
            return Err(RouteError::invalid_request(
                "start and end must differ; request a round trip instead",
            ));
        }
        Ok(Self {
            index,
            start,
            end,
            closed,
        })
    }

    pub fn index(&self) -> &ReducedCostIndex {
        &self.index
    }

    /// Number of nodes every tour must visit.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn start(&self) -> Option<usize> {
        self.start
    }

    pub fn end(&self) -> Option<usize> {
        self.end
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn cost(&self, a: usize, b: usize) -> f64 {
        self.index.cost(a, b)
    }

    /// Consecutive legs of `order`, closing leg last for round trips.
    pub fn legs<'a>(&self, order: &'a [usize]) -> impl Iterator<Item = (usize, usize)> + 'a {
        let closing = match (self.closed && order.len() > 1, order.first(), order.last()) {
            (true, Some(&first), Some(&last)) => Some((last, first)),
            _ => None,
        };
        order.windows(2).map(|w| (w[0], w[1])).chain(closing)
    }

    /// Sum of leg costs in visiting order. Infinite if any leg is disconnected.
    pub fn tour_cost(&self, order: &[usize]) -> f64 {
        self.legs(order)
            .fold(0.0, |total, (a, b)| total + self.cost(a, b))
    }

    pub fn is_feasible(&self, order: &[usize]) -> bool {
        self.legs(order).all(|(a, b)| self.index.is_connected(a, b))
    }

    pub fn hop_count(&self, order: &[usize]) -> usize {
        self.legs(order)
            .filter(|&(a, b)| self.index.kind(a, b) == Some(LegKind::Hop))
            .count()
    }

    pub fn evaluate(&self, order: Vec<usize>) -> Tour {
        let cost = self.tour_cost(&order);
        Tour { order, cost }
    }

    /// Half-open range of positions a move may touch in a tour of `len` nodes.
    pub fn movable(&self, len: usize) -> (usize, usize) {
        let lo = usize::from(self.start.is_some() || self.closed);
        let hi = if self.end.is_some() {
            len.saturating_sub(1)
        } else {
            len
        };
        (lo.min(hi), hi)
    }

    #[inline]
    fn leg(&self, a: Option<usize>, b: Option<usize>) -> f64 {
        match (a, b) {
            (Some(a), Some(b)) => self.cost(a, b),
            _ => 0.0,
        }
    }

    fn pred(&self, order: &[usize], pos: usize) -> Option<usize> {
        if pos > 0 {
            Some(order[pos - 1])
        } else if self.closed && order.len() > 1 {
            order.last().copied()
        } else {
            None
        }
    }

    fn succ(&self, order: &[usize], pos: usize) -> Option<usize> {
        if pos + 1 < order.len() {
            Some(order[pos + 1])
        } else if self.closed && order.len() > 1 {
            order.first().copied()
        } else {
            None
        }
    }

    /// Cost change `mv` would cause. Non-finite when it needs a disconnected leg.
    pub fn delta(&self, order: &[usize], mv: &TourMove) -> f64 {
        match *mv {
            TourMove::TwoOpt { i, j } => {
                let p = self.pred(order, i);
                let q = self.succ(order, j);
                let (first, last) = (Some(order[i]), Some(order[j]));
                self.leg(p, last) + self.leg(first, q) - self.leg(p, first) - self.leg(last, q)
            }
            TourMove::Relocate { from, to } => {
                if from == to {
                    return 0.0;
                }
                let x = Some(order[from]);
                let p = self.pred(order, from);
                let q = self.succ(order, from);

                // Neighbours of the insertion point in the tour without `x`.
                let m = order.len() - 1;
                let without = |k: usize| if k < from { order[k] } else { order[k + 1] };
                let a = if to > 0 {
                    Some(without(to - 1))
                } else if self.closed && m > 0 {
                    Some(without(m - 1))
                } else {
                    None
                };
                let b = if to < m {
                    Some(without(to))
                } else if self.closed && m > 0 {
                    Some(without(0))
                } else {
                    None
                };

                self.leg(p, q) - self.leg(p, x) - self.leg(x, q) + self.leg(a, x)
                    + self.leg(x, b)
                    - self.leg(a, b)
            }
        }
    }

    /// Cost change from inserting `slot` (not yet in `order`) at position `to`.
    pub fn insertion_delta(&self, order: &[usize], slot: usize, to: usize) -> f64 {
        let len = order.len();
        let a = if to > 0 {
            Some(order[to - 1])
        } else if self.closed {
            order.last().copied()
        } else {
            None
        };
        let b = if to < len {
            Some(order[to])
        } else if self.closed {
            order.first().copied()
        } else {
            None
        };
        let x = Some(slot);
        self.leg(a, x) + self.leg(x, b) - self.leg(a, b)
    }

    /// Draws a uniformly random 2-opt or relocation inside the movable range.
    pub fn random_move<R: Rng>(&self, order: &[usize], rng: &mut R) -> Option<TourMove> {
        let (lo, hi) = self.movable(order.len());
        if hi < lo + 2 {
            return None;
        }
        if rng.random_bool(0.5) {
            let i = rng.random_range(lo..hi - 1);
            let j = rng.random_range(i + 1..hi);
            Some(TourMove::TwoOpt { i, j })
        } else {
            let from = rng.random_range(lo..hi);
            let mut to = rng.random_range(lo..hi - 1);
            if to >= from {
                to += 1;
            }
            Some(TourMove::Relocate { from, to })
        }
    }
}

impl AnnealingProblem for SearchSpace {
    type Solution = Vec<usize>;
    type Move = TourMove;

    fn cost(&self, order: &Vec<usize>) -> f64 {
        self.tour_cost(order)
    }

    fn propose<R: Rng>(&self, order: &Vec<usize>, rng: &mut R) -> Option<TourMove> {
        self.random_move(order, rng)
    }

    fn delta(&self, order: &Vec<usize>, mv: &TourMove) -> f64 {
        SearchSpace::delta(self, order, mv)
    }

    fn apply(&self, order: &mut Vec<usize>, mv: &TourMove) {
        mv.apply(order);
    }
}
