//! Run configuration loaded from TOML.
//!
//! ```toml
//! [population]
//! size = 40
//! seed = 7
//!
//! [evolution]
//! generations = 200
//! minimize = true
//! mutation_rate = 0.2
//! crossover = "blend"
//!
//! [checkpoint]
//! path = "runs/xor.ckpt"
//! every = 25
//! ```
//!
//! Every key is optional and falls back to [`EvolveConfig::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ga::CrossoverAlgorithm;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvolveConfig {
    pub population: PopulationConfig,
    pub evolution: EvolutionConfig,
    pub checkpoint: CheckpointConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopulationConfig {
    /// Genome count at construction.
    pub size: usize,
    /// Seed for the population's random source; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 32,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvolutionConfig {
    pub generations: u64,
    /// Lower fitness is better when true.
    pub minimize: bool,
    /// Survivors per selection; `count / 2` when absent.
    pub take: Option<usize>,
    pub mutation_rate: f64,
    pub mutation_gaussian: bool,
    pub crossover: CrossoverAlgorithm,
    pub crossover_gaussian: bool,
    pub stop_on_convergence: bool,
    pub convergence_window: usize,
    pub convergence_threshold: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            minimize: true,
            take: None,
            mutation_rate: 0.1,
            mutation_gaussian: false,
            crossover: CrossoverAlgorithm::Uniform,
            crossover_gaussian: true,
            stop_on_convergence: false,
            convergence_window: 50,
            convergence_threshold: 0.001,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckpointConfig {
    /// Destination file; no checkpoints are written when absent.
    pub path: Option<PathBuf>,
    /// Write every N generations (0 = only at the end of a run).
    pub every: u64,
}

impl EvolveConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: EvolveConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let evo = &self.evolution;
        if !(0.0..=1.0).contains(&evo.mutation_rate) {
            return Err(Error::Config(format!(
                "evolution.mutation_rate must be in [0, 1], got {}",
                evo.mutation_rate
            )));
        }
        if self.population.size < 2 {
            return Err(Error::Config(format!(
                "population.size must be at least 2, got {}",
                self.population.size
            )));
        }
        if evo.take == Some(0) {
            return Err(Error::Config("evolution.take must be positive".into()));
        }
        if evo.convergence_threshold < 0.0 {
            return Err(Error::Config(
                "evolution.convergence_threshold must not be negative".into(),
            ));
        }
        Ok(())
    }
}
