//! Genetic-algorithm engine.
//!
//! [`Population`] evolves any [`Genome`] through caller-driven generations of
//! selection, crossover and mutation. [`operators`] supplies stock crossover
//! and mutation over weight vectors; [`evolution`] runs whole experiments.

pub mod evolution;
pub mod genome;
pub mod operators;
pub mod population;

pub use evolution::{ConvergenceTracker, Evolution, GenerationReport, OptimizerStatus};
pub use genome::Genome;
pub use operators::CrossoverAlgorithm;
pub use population::{FitnessStats, Population, CROSSOVER_RANGE};
