//! Random number generation for the simulation.
//!
//! Uses a seeded ChaCha RNG so a simulation run is reproducible. Only the
//! flicker timers draw from it; everything else is deterministic.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Simulation random number generator.
///
/// Wraps `ChaCha8Rng` for reproducible random number generation.
/// Only the seed is serialized; a restored simulation restarts the stream.
#[derive(Debug, Clone)]
pub struct SimRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl Serialize for SimRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SimRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(SimRng::new(seed))
    }
}

impl SimRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Get the seed used to create this RNG.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `[lo, hi)`. Returns `lo` when the range is empty.
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }
}
