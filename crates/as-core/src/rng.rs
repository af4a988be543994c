//! Deterministic per-chooser and stage-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Every choice stage derives its own seed from the run seed and a hash of the
//! stage name ([`stream_seed`]).  Within a stage, each decision
//! maker (person, household) gets an independent `SmallRng` seeded by:
//!
//!   seed = stage_seed XOR (chooser_key * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive keys across the seed space.  Consequences:
//!
//! - Choosers never share RNG state, so the parallel stages can draw in any
//!   order and still reproduce a serial run.
//! - Dropping a household from the input does not disturb the draws of the
//!   remaining ones.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Derive the seed of sub-stream `stream` from `global_seed`.
#[inline]
pub fn stream_seed(global_seed: u64, stream: u64) -> u64 {
    global_seed ^ stream.wrapping_add(1).wrapping_mul(MIXING_CONSTANT).rotate_left(17)
}

// ── ChooserRng ────────────────────────────────────────────────────────────────

/// Per-chooser deterministic RNG.
///
/// Created on the fly for each decision maker; cheap enough that stages do
/// not store them.
pub struct ChooserRng(SmallRng);

impl ChooserRng {
    /// Seed deterministically from a stage seed and a chooser's record key.
    pub fn new(stage_seed: u64, chooser_key: u64) -> Self {
        let seed = stage_seed ^ chooser_key.wrapping_mul(MIXING_CONSTANT);
        ChooserRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` / `rand_distr`
    /// distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Choose `amount` distinct indices from `0..len` without replacement.
    /// Returns all indices (in random order) when `amount >= len`.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.0, len, amount.min(len)).into_vec()
    }

    /// Choose a random element from a slice.  `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Stage-level RNG for operations not tied to one chooser (shuffling the
/// chooser order, sampling validation subsets).
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }
}
