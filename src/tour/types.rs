//! Evaluated tours.

/// An ordered visit sequence together with its exact cost.
///
/// Built only through [`SearchSpace::evaluate`](super::SearchSpace::evaluate),
/// so `cost` always equals the in-order sum of its legs.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    pub(crate) order: Vec<usize>,
    pub(crate) cost: f64,
}

impl Tour {
    /// Slots in visiting order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
