//! Stock crossover and mutation over `f64` weight vectors.
//!
//! Genomes whose encoding is a flat weight vector (a `Volume`'s values, a
//! `Matrix`'s cells) can delegate their `crossover` and `mutate` here.

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// Default perturbation scale for [`mutate_weights`].
pub const MUTATION_STEP: f64 = 0.5;

/// How two weight vectors are recombined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossoverAlgorithm {
    /// Each position swapped between the children with probability 1/2.
    #[default]
    Uniform,
    /// Tails after one random cut point are exchanged.
    SinglePoint,
    /// The segment between two random cut points is exchanged.
    TwoPoint,
    /// Children are complementary convex combinations of the parents.
    Blend,
}

impl std::fmt::Display for CrossoverAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrossoverAlgorithm::Uniform => write!(f, "uniform"),
            CrossoverAlgorithm::SinglePoint => write!(f, "single-point"),
            CrossoverAlgorithm::TwoPoint => write!(f, "two-point"),
            CrossoverAlgorithm::Blend => write!(f, "blend"),
        }
    }
}

/// Recombine `a` and `b` into two children.
///
/// Only the common prefix is recombined; a longer parent's tail stays with
/// the child that started from it.
pub fn crossover_weights(
    a: &[f64],
    b: &[f64],
    algorithm: CrossoverAlgorithm,
    rng: &mut RandomSource,
) -> (Vec<f64>, Vec<f64>) {
    let mut left = a.to_vec();
    let mut right = b.to_vec();
    let n = a.len().min(b.len());

    match algorithm {
        CrossoverAlgorithm::Uniform => {
            for i in 0..n {
                if rng.next_uniform() < 0.5 {
                    std::mem::swap(&mut left[i], &mut right[i]);
                }
            }
        }
        CrossoverAlgorithm::SinglePoint => {
            let cut = rng.next_index(false, 0, n);
            left[cut..n].swap_with_slice(&mut right[cut..n]);
        }
        CrossoverAlgorithm::TwoPoint => {
            let p = rng.next_index(false, 0, n);
            let q = rng.next_index(false, 0, n);
            let (lo, hi) = (p.min(q), p.max(q));
            left[lo..hi].swap_with_slice(&mut right[lo..hi]);
        }
        CrossoverAlgorithm::Blend => {
            let alpha = rng.next_uniform();
            for i in 0..n {
                let (x, y) = (a[i], b[i]);
                left[i] = alpha * x + (1.0 - alpha) * y;
                right[i] = (1.0 - alpha) * x + alpha * y;
            }
        }
    }

    (left, right)
}

/// Perturb each weight with probability `rate` by a uniform `[-1, 1)` or
/// standard normal delta, scaled by `step`. Returns how many changed.
pub fn mutate_weights(
    weights: &mut [f64],
    rate: f64,
    step: f64,
    gaussian: bool,
    rng: &mut RandomSource,
) -> usize {
    let mut changed = 0;
    for w in weights.iter_mut() {
        if rng.next_uniform() >= rate {
            continue;
        }
        let delta = if gaussian {
            rng.next_gaussian()
        } else {
            rng.next_uniform() * 2.0 - 1.0
        };
        *w += delta * step;
        changed += 1;
    }
    changed
}
