//! SA execution loop.

use super::config::SaConfig;
use super::types::AnnealingProblem;
use rand::Rng;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best solution found.
    pub best: S,

    /// Cost of the best solution, recomputed from scratch.
    pub best_cost: f64,

    /// Cost of the starting solution.
    pub start_cost: f64,

    /// Total number of iterations (move proposals).
    pub iterations: usize,

    /// Final temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Best cost sampled at regular intervals for history tracking.
    pub cost_history: Vec<f64>,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA from `start` using the caller's random source.
    ///
    /// The run is a pure function of `(problem, start, config, rng state)`:
    /// the same inputs give bit-for-bit the same result. The returned
    /// solution never costs more than `start`.
    pub fn run<P, R>(
        problem: &P,
        start: P::Solution,
        config: &SaConfig,
        rng: &mut R,
    ) -> Result<SaResult<P::Solution>, String>
    where
        P: AnnealingProblem,
        R: Rng,
    {
        config.validate()?;

        let start_cost = problem.cost(&start);
        if !start_cost.is_finite() {
            return Err("starting solution is infeasible".into());
        }

        let mut current = start.clone();
        let mut current_cost = start_cost;
        let mut best = start.clone();
        let mut best_cost = start_cost;

        let mut temperature = config.initial_temperature;
        let mut total_iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        let mut cost_history = Vec::with_capacity(config.iterations / config.history_interval + 2);
        cost_history.push(best_cost);

        while total_iterations < config.iterations {
            let Some(mv) = problem.propose(&current, rng) else {
                break;
            };
            let delta = problem.delta(&current, &mv);

            // Metropolis acceptance criterion
            let accept = if !delta.is_finite() {
                false
            } else if delta <= 0.0 {
                if delta < 0.0 {
                    improving_moves += 1;
                }
                true
            } else if temperature >= config.min_temperature {
                let probability = (-delta / temperature).exp();
                rng.random_range(0.0..1.0) < probability
            } else {
                false
            };

            if accept {
                problem.apply(&mut current, &mv);
                current_cost += delta;
                accepted_moves += 1;

                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                }
            }

            total_iterations += 1;
            temperature *= config.cooling_rate;

            if total_iterations.is_multiple_of(config.history_interval) {
                cost_history.push(best_cost);
            }
        }

        // Deltas accumulate rounding error; settle on the exact figure and
        // never hand back something worse than the start.
        best_cost = problem.cost(&best);
        if best_cost.is_nan() || best_cost > start_cost {
            best = start;
            best_cost = start_cost;
        }

        if cost_history
            .last()
            .is_none_or(|&last| (last - best_cost).abs() > 1e-15)
        {
            cost_history.push(best_cost);
        }

        Ok(SaResult {
            best,
            best_cost,
            start_cost,
            iterations: total_iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            cost_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // ---- Quadratic minimization: f(x) = x^2, minimum at 0 ----

    struct QuadraticProblem;

    impl AnnealingProblem for QuadraticProblem {
        type Solution = f64;
        type Move = f64;

        fn cost(&self, x: &f64) -> f64 {
            x * x
        }

        fn propose<R: Rng>(&self, _x: &f64, rng: &mut R) -> Option<f64> {
            Some(rng.random_range(-1.0..1.0))
        }

        fn delta(&self, x: &f64, step: &f64) -> f64 {
            (x + step) * (x + step) - x * x
        }

        fn apply(&self, x: &mut f64, step: &f64) {
            *x += step;
        }
    }

    fn config() -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(100.0)
            .with_cooling_rate(0.999)
            .with_iterations(20_000)
            .with_history_interval(100)
    }

    #[test]
    fn test_sa_quadratic() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let result = SaRunner::run(&QuadraticProblem, 8.0, &config(), &mut rng).unwrap();

        assert!(
            result.best_cost < 1.0,
            "expected near-zero cost, got {}",
            result.best_cost
        );
        assert!(result.improving_moves > 0);
        assert!(result.accepted_moves > result.improving_moves);
        assert_eq!(result.iterations, 20_000);
    }

    #[test]
    fn test_sa_is_deterministic() {
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            SaRunner::run(&QuadraticProblem, 8.0, &config(), &mut rng).unwrap()
        };
        let (a, b) = (run(7), run(7));
        assert_eq!(a.best.to_bits(), b.best.to_bits());
        assert_eq!(a.best_cost.to_bits(), b.best_cost.to_bits());
        assert_eq!(a.accepted_moves, b.accepted_moves);
    }

    #[test]
    fn test_sa_never_worse_than_start() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let config = config().with_iterations(10);
        let result = SaRunner::run(&QuadraticProblem, 0.0, &config, &mut rng).unwrap();
        assert_eq!(result.best, 0.0);
        assert_eq!(result.best_cost, 0.0);
    }

    /// Every move costs exactly one unit more.
    struct UphillProblem;

    impl AnnealingProblem for UphillProblem {
        type Solution = u32;
        type Move = ();

        fn cost(&self, x: &u32) -> f64 {
            *x as f64
        }

        fn propose<R: Rng>(&self, _x: &u32, _rng: &mut R) -> Option<()> {
            Some(())
        }

        fn delta(&self, _x: &u32, _mv: &()) -> f64 {
            1.0
        }

        fn apply(&self, x: &mut u32, _mv: &()) {
            *x += 1;
        }
    }

    #[test]
    fn test_sa_cold_rejects_uphill() {
        // Temperature drops below the floor after the first iteration.
        let config = SaConfig::default()
            .with_initial_temperature(1.0)
            .with_min_temperature(0.9)
            .with_cooling_rate(0.5)
            .with_iterations(1_000);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let result = SaRunner::run(&UphillProblem, 0, &config, &mut rng).unwrap();
        assert!(result.accepted_moves <= 1);
        assert_eq!(result.best, 0);
        assert_eq!(result.improving_moves, 0);
    }

    #[test]
    fn test_sa_invalid_config() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = config().with_cooling_rate(2.0);
        assert!(SaRunner::run(&QuadraticProblem, 1.0, &config, &mut rng).is_err());
    }

    #[test]
    fn test_sa_cost_history_non_increasing() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let result = SaRunner::run(&QuadraticProblem, 9.0, &config(), &mut rng).unwrap();

        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0] + 1e-10,
                "best cost history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    // ---- Discrete: permutation sorting ----

    struct PermSortProblem {
        n: usize,
    }

    impl AnnealingProblem for PermSortProblem {
        type Solution = Vec<usize>;
        type Move = (usize, usize);

        fn cost(&self, perm: &Vec<usize>) -> f64 {
            // Number of elements not in their correct position
            perm.iter().enumerate().filter(|&(i, &v)| i != v).count() as f64
        }

        fn propose<R: Rng>(&self, _perm: &Vec<usize>, rng: &mut R) -> Option<(usize, usize)> {
            Some((rng.random_range(0..self.n), rng.random_range(0..self.n)))
        }

        fn delta(&self, perm: &Vec<usize>, &(i, j): &(usize, usize)) -> f64 {
            let mut next = perm.clone();
            next.swap(i, j);
            self.cost(&next) - self.cost(perm)
        }

        fn apply(&self, perm: &mut Vec<usize>, &(i, j): &(usize, usize)) {
            perm.swap(i, j);
        }
    }

    #[test]
    fn test_sa_permutation_sort() {
        let problem = PermSortProblem { n: 10 };
        let start: Vec<usize> = (0..10).rev().collect();
        let config = SaConfig::default()
            .with_initial_temperature(5.0)
            .with_cooling_rate(0.999)
            .with_iterations(20_000);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let result = SaRunner::run(&problem, start, &config, &mut rng).unwrap();

        assert!(
            result.best_cost <= 4.0,
            "expected near-sorted permutation, got cost {}",
            result.best_cost
        );
        assert!(result.best_cost <= result.start_cost);
    }

    #[test]
    fn test_sa_metropolis_accepts_uphill() {
        // At very high temperature, almost all moves should be accepted
        let config = SaConfig::default()
            .with_initial_temperature(1e8)
            .with_cooling_rate(0.99999)
            .with_iterations(5_000);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let result = SaRunner::run(&QuadraticProblem, 0.0, &config, &mut rng).unwrap();

        let acceptance_ratio = result.accepted_moves as f64 / result.iterations as f64;
        assert!(
            acceptance_ratio > 0.8,
            "expected high acceptance at high temp, got {acceptance_ratio}"
        );
    }
}
