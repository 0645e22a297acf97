//! Random number generation for the engine
//!
//! Uses a seeded ChaCha RNG so tracer and real traversals can be replayed
//! from the same seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Engine random number generator
///
/// Wraps ChaCha8Rng for reproducible rolls. Only the seed is serialized;
/// a deserialized generator restarts its stream from that seed.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(GameRng::new(seed))
    }
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in `0..n`
    ///
    /// Returns 0 if n is not positive.
    pub fn random2(&mut self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Average of `rolls` draws, biased toward the middle of `0..=max`
    ///
    /// The first draw is `random2(max)`, the rest `random2(max + 1)`.
    pub fn random2avg(&mut self, max: i32, rolls: i32) -> i32 {
        if rolls <= 0 {
            return 0;
        }
        let mut sum = self.random2(max);
        for _ in 1..rolls {
            sum += self.random2(max + 1);
        }
        sum / rolls
    }

    /// Uniform draw in `low..=high`
    pub fn random_range(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        low + self.random2(high - low + 1)
    }

    /// Roll `num` dice with `size` sides
    ///
    /// Returns 0 when either argument is not positive.
    pub fn roll_dice(&mut self, num: i32, size: i32) -> i32 {
        if num <= 0 || size <= 0 {
            return 0;
        }
        (0..num).map(|_| 1 + self.random2(size)).sum()
    }

    /// Returns true with probability 1/n
    pub fn one_chance_in(&mut self, n: i32) -> bool {
        self.random2(n) == 0
    }

    /// Returns true half of the time
    pub fn coinflip(&mut self) -> bool {
        self.random2(2) == 0
    }

    /// Returns true with probability x/y
    pub fn x_chance_in_y(&mut self, x: i32, y: i32) -> bool {
        if x <= 0 {
            return false;
        }
        if x >= y {
            return true;
        }
        self.random2(y) < x
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.random2(items.len() as i32) as usize)
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
