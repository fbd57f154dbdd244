//! Tours and the move algebra shared by construction and refinement.
//!
//! A tour is an ordered list of index slots. [`SearchSpace`] pairs a
//! [`ReducedCostIndex`](crate::cost::ReducedCostIndex) with the pinning rules
//! of the request and answers three questions for search code:
//!
//! - what a tour costs (summed in order, so the figure is reproducible);
//! - what a 2-opt reversal or a single-node relocation would change;
//! - which positions a move may touch.
//!
//! Every leg of a tour is connected. Moves that would introduce a
//! disconnected leg report an infinite delta and must be rejected.

mod moves;
mod space;
mod types;

pub use moves::TourMove;
pub use space::SearchSpace;
pub use types::Tour;
