//! XOR experiment: a 2-2-1 sigmoid network whose nine weights live in a
//! `Volume` and are evolved rather than trained.
//!
//! Weight layout: `[w00, w01, w10, w11, b0, b1, v0, v1, c]` where hidden unit
//! `j` computes `sigmoid(wj0 * x0 + wj1 * x1 + bj)` and the output is
//! `sigmoid(v0 * h0 + v1 * h1 + c)`.

use serde::{Deserialize, Serialize};

use crate::ga::operators::{crossover_weights, mutate_weights, CrossoverAlgorithm, MUTATION_STEP};
use crate::ga::Genome;
use crate::random::RandomSource;
use crate::tensor::{Init, Volume};

/// Number of network parameters.
pub const PARAMS: usize = 9;

/// XOR truth table.
pub const CASES: [([f64; 2], f64); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[derive(Clone, Debug)]
pub struct XorGenome {
    id: usize,
    weights: Volume,
    fitness: f64,
}

/// Checkpoint form of an [`XorGenome`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct XorState {
    pub id: usize,
    pub fitness: f64,
    pub weights: Vec<f64>,
}

impl XorGenome {
    /// Variance-scaled Gaussian weights.
    pub fn random(rng: &mut RandomSource) -> Self {
        Self::from_volume(Volume::new(PARAMS, Init::Gaussian, rng))
    }

    pub fn from_volume(weights: Volume) -> Self {
        Self {
            id: 0,
            weights,
            fitness: f64::NAN,
        }
    }

    pub fn from_state(state: XorState) -> Self {
        Self {
            id: state.id,
            weights: Volume::from_weights(state.weights),
            fitness: state.fitness,
        }
    }

    pub fn weights(&self) -> &Volume {
        &self.weights
    }

    pub fn predict(&self, x: [f64; 2]) -> f64 {
        let w = self.weights.weights();
        let h0 = sigmoid(w[0] * x[0] + w[1] * x[1] + w[4]);
        let h1 = sigmoid(w[2] * x[0] + w[3] * x[1] + w[5]);
        sigmoid(w[6] * h0 + w[7] * h1 + w[8])
    }

    /// Mean squared error over the truth table.
    pub fn error(&self) -> f64 {
        let sum: f64 = CASES
            .iter()
            .map(|(x, want)| (self.predict(*x) - want).powi(2))
            .sum();
        sum / CASES.len() as f64
    }
}

impl Genome for XorGenome {
    type State = XorState;
    type Algorithm = CrossoverAlgorithm;

    fn id(&self) -> usize {
        self.id
    }

    fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    fn calculate_fitness(&mut self) {
        self.fitness = self.error();
    }

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn state(&self) -> XorState {
        XorState {
            id: self.id,
            fitness: self.fitness,
            weights: self.weights.weights().to_vec(),
        }
    }

    fn mutate(&mut self, rate: f64, gaussian: bool, rng: &mut RandomSource) {
        mutate_weights(self.weights.weights_mut(), rate, MUTATION_STEP, gaussian, rng);
    }

    /// Two children per pairing. The population assigns their ids.
    fn crossover(
        a: &Self,
        b: &Self,
        algorithm: &CrossoverAlgorithm,
        _gaussian: bool,
        rng: &mut RandomSource,
    ) -> Vec<Self> {
        let (left, right) =
            crossover_weights(a.weights.weights(), b.weights.weights(), *algorithm, rng);
        [left, right]
            .into_iter()
            .map(|w| XorGenome::from_volume(Volume::from_weights(w)))
            .collect()
    }
}
