//! What a worker does with a pass request.

use super::messages::{Champion, PassRequest};
use crate::sa::SaRunner;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Runs one pass. Implementations must be pure functions of the request.
pub trait PassExecutor: Send + Sync + 'static {
    fn execute(&self, request: &PassRequest) -> Result<Champion, String>;
}

/// Simulated annealing from the request's starting tour, with a
/// `ChaCha8Rng` seeded from the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnealingExecutor;

impl PassExecutor for AnnealingExecutor {
    fn execute(&self, request: &PassRequest) -> Result<Champion, String> {
        let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
        let space = request.space.as_ref();
        let result = SaRunner::run(space, request.start.to_vec(), &request.config, &mut rng)?;
        Ok(Champion {
            pass: request.correlation.pass,
            tour: space.evaluate(result.best),
            start_cost: result.start_cost,
            accepted_moves: result.accepted_moves,
            improving_moves: result.improving_moves,
        })
    }
}
