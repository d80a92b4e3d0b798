// Injectable random source
//
// Each worker owns its own generator. With a seed the streams are
// reproducible; without one they come from OS entropy.

use crate::application::worker::constants::WORKER_SEED_STRIDE;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Builds per-worker random generators
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSource {
    seed: Option<u64>,
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { seed: None }
    }

    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    /// Generator for worker `worker_id` (1-based)
    pub fn worker_rng(&self, worker_id: usize) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(
                seed ^ (worker_id as u64).wrapping_mul(WORKER_SEED_STRIDE),
            ),
            None => StdRng::from_entropy(),
        }
    }
}
