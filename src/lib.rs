//! Tensor substrate and genetic-algorithm engine.
//!
//! - [`tensor::Volume`]: value/gradient block with fixed 3-axis addressing.
//! - [`matrix::Matrix`]: 2-D grid with deterministic and random fills.
//! - [`ga::Population`]: selection, crossover and mutation over any
//!   [`ga::Genome`].
//! - [`checkpoint`]: persistence of population states.

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod experiments;
pub mod ga;
pub mod matrix;
pub mod random;
pub mod tensor;

pub use config::EvolveConfig;
pub use error::{Error, Result};
pub use ga::{Genome, Population};
pub use matrix::Matrix;
pub use random::RandomSource;
pub use tensor::{Init, Volume};
