//! Seeded train/held-out partitioning

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Record indices for each partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Shuffle `0..n` with `seed` and hold out `ceil(test_ratio * n)` indices.
    ///
    /// The training side always keeps at least one index when `n > 0`.
    pub fn new(n: usize, test_ratio: f64, seed: u64) -> Self {
        let ratio = if test_ratio.is_finite() {
            test_ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let n_test = ((ratio * n as f64).ceil() as usize).min(n.saturating_sub(1));

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let train = indices.split_off(n_test);
        Self {
            train,
            test: indices,
        }
    }
}
