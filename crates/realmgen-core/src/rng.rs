//! The single seeded random stream shared by the pipeline.
//!
//! Stages draw from one `WorldRng` in a fixed order. A stage that must not
//! disturb the stream seen by later consumers works on a [`WorldRng::snapshot`]
//! and the caller decides whether to [`WorldRng::restore`] the advanced state.

use rand::distributions::uniform::SampleRange;
use rand::distributions::uniform::SampleUniform;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct WorldRng {
    seed: u64,
    inner: StdRng,
}

impl WorldRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, inner: StdRng::seed_from_u64(seed) }
    }

    /// The seed this stream was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rewind the stream to its freshly seeded state.
    pub fn reset(&mut self) {
        self.inner = StdRng::seed_from_u64(self.seed);
    }

    /// An independent copy of the current stream state.
    pub fn snapshot(&self) -> WorldRng {
        self.clone()
    }

    /// Replace the current state with `state`.
    pub fn restore(&mut self, state: WorldRng) {
        *self = state;
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    #[inline]
    pub fn range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.inner.gen_range(range)
    }

    /// A raw 32-bit draw, used to seed derived noise generators.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.inner.gen::<u32>()
    }

    /// Index drawn from a precomputed weighted distribution.
    #[inline]
    pub fn weighted(&mut self, dist: &WeightedIndex<f64>) -> usize {
        dist.sample(&mut self.inner)
    }
}
