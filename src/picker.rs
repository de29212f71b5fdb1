//! Seeded piece randomizer
//!
//! Every draw is uniform over the mode's catalog with no history; repeats and droughts
//! are allowed. The generator is seeded so a session can be replayed exactly.

use crate::mode::GameMode;
use crate::shape::{Shape, random_shape};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform piece randomizer
#[derive(Debug, Clone)]
pub struct Picker {
    mode: GameMode,
    rng: ChaCha8Rng,
}

impl Picker {
    /// Create a picker with a random seed
    pub fn new(mode: GameMode) -> Self {
        Self::with_seed(mode, rand::random())
    }

    /// Create a picker whose sequence is fully determined by `seed`
    pub fn with_seed(mode: GameMode, seed: u64) -> Self {
        Self {
            mode,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw the next shape
    pub fn next_shape(&mut self) -> &'static Shape {
        random_shape(self.mode, &mut self.rng)
    }

    /// Draw a value in `0..bound`, used for the angular entry slot on rings
    pub fn next_slot(&mut self, bound: i32) -> i32 {
        if bound <= 1 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }
}
