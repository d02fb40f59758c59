//! Owned random sources.
//!
//! Uniform samples come from a seedable `StdRng`; Gaussian samples are drawn
//! from `statrs`' standard normal on top of that same generator, then shifted
//! and scaled. Every consumer owns (or borrows mutably) its own source, so a
//! seed fully determines a run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

/// Uniform source with a Gaussian sampler layered on top.
#[derive(Clone, Debug)]
pub struct RandomSource {
    rng: StdRng,
    normal: Normal,
}

impl RandomSource {
    /// Deterministic source: the same seed replays the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            normal: Normal::standard(),
        }
    }

    /// Uniform sample in `[0, 1)`.
    pub fn next_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Standard normal sample (mean 0, deviation 1).
    pub fn next_gaussian(&mut self) -> f64 {
        self.rng.sample(self.normal)
    }

    /// Normal sample with explicit mean and deviation.
    ///
    /// A zero deviation yields `mean`; a negative one mirrors the sample.
    pub fn next_gaussian_with(&mut self, mean: f64, dev: f64) -> f64 {
        mean + dev * self.next_gaussian()
    }

    /// Integer in `[min, max]`, drawn uniformly or from a normal centred on
    /// the middle of the window (deviation = a quarter of its width, clamped
    /// back into the window).
    pub fn next_index(&mut self, gaussian: bool, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        if !gaussian {
            return self.rng.gen_range(min..=max);
        }
        let centre = (min + max) as f64 / 2.0;
        let dev = (max - min) as f64 / 4.0;
        let sample = self.next_gaussian_with(centre, dev).round();
        sample.clamp(min as f64, max as f64) as usize
    }

    /// Access to the underlying generator for `rand` APIs.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}
