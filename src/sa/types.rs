//! Core trait for Simulated Annealing.

use rand::Rng;

/// Defines a Simulated Annealing problem in terms of incremental moves.
///
/// The user implements move generation, delta evaluation and move
/// application. The SA framework handles temperature management, the
/// acceptance criterion and best-solution tracking.
///
/// # Minimization
///
/// SA minimizes the cost function. For maximization, negate the cost.
///
/// # Infeasible moves
///
/// [`delta`](AnnealingProblem::delta) may return a non-finite value for a
/// move that would break feasibility; such moves are always rejected.
///
/// # Examples
///
/// ```ignore
/// struct SwapProblem { distances: Vec<Vec<f64>> }
///
/// impl AnnealingProblem for SwapProblem {
///     type Solution = Vec<usize>;
///     type Move = (usize, usize);
///
///     fn cost(&self, tour: &Vec<usize>) -> f64 {
///         tour.windows(2).map(|w| self.distances[w[0]][w[1]]).sum()
///     }
///
///     fn propose<R: Rng>(&self, tour: &Vec<usize>, rng: &mut R) -> Option<(usize, usize)> {
///         Some((rng.random_range(0..tour.len()), rng.random_range(0..tour.len())))
///     }
///
///     fn delta(&self, tour: &Vec<usize>, mv: &(usize, usize)) -> f64 {
///         let mut next = tour.clone();
///         next.swap(mv.0, mv.1);
///         self.cost(&next) - self.cost(tour)
///     }
///
///     fn apply(&self, tour: &mut Vec<usize>, mv: &(usize, usize)) {
///         tour.swap(mv.0, mv.1);
///     }
/// }
/// ```
pub trait AnnealingProblem: Send + Sync {
    /// The solution representation type.
    type Solution: Clone + Send;

    /// A perturbation of a solution.
    type Move: Copy;

    /// Computes the cost of a solution. Lower is better.
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// Draws a random move, or `None` when the solution has no neighbours.
    fn propose<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Option<Self::Move>;

    /// Cost change applying `mv` would cause.
    fn delta(&self, solution: &Self::Solution, mv: &Self::Move) -> f64;

    /// Applies `mv` in place.
    fn apply(&self, solution: &mut Self::Solution, mv: &Self::Move);
}
