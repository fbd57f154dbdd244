//! Tour perturbations.

/// A local change to a tour, addressed by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourMove {
    /// Reverse positions `i..=j` (`i < j`).
    TwoOpt { i: usize, j: usize },
    /// Take the node at `from` out and reinsert it so it ends up at `to`.
    Relocate { from: usize, to: usize },
}

impl TourMove {
    /// Applies the move in place.
    pub fn apply(&self, order: &mut Vec<usize>) {
        match *self {
            TourMove::TwoOpt { i, j } => order[i..=j].reverse(),
            TourMove::Relocate { from, to } => {
                let node = order.remove(from);
                order.insert(to, node);
            }
        }
    }
}
