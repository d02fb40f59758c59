//! Multi-generation driver.
//!
//! One generation is Selection → Crossover → Mutation on a [`Population`].
//! The best survivor's fitness feeds a [`ConvergenceTracker`]; a run stops at
//! the configured generation budget or, optionally, on convergence.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::info;

use super::genome::Genome;
use super::population::Population;
use crate::checkpoint::{self, CheckpointMeta};
use crate::config::{CheckpointConfig, EvolutionConfig};
use crate::error::Result;

/// Convergence status of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerStatus {
    Improving,
    Plateaued,
    Converged,
}

impl std::fmt::Display for OptimizerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizerStatus::Improving => write!(f, "improving"),
            OptimizerStatus::Plateaued => write!(f, "plateaued"),
            OptimizerStatus::Converged => write!(f, "converged"),
        }
    }
}

/// Windowed relative-improvement tracker.
///
/// Once the window is full, an improvement between its oldest and newest
/// score below `threshold` counts as a plateau; three consecutive plateaus
/// mean convergence.
#[derive(Clone, Debug)]
pub struct ConvergenceTracker {
    scores: VecDeque<f64>,
    window: usize,
    threshold: f64,
    minimize: bool,
    plateau_count: usize,
}

impl ConvergenceTracker {
    pub fn new(window: usize, threshold: f64, minimize: bool) -> Self {
        Self {
            scores: VecDeque::new(),
            window: window.max(2),
            threshold,
            minimize,
            plateau_count: 0,
        }
    }

    /// Record a generation's best score and return the current status.
    pub fn record(&mut self, score: f64) -> OptimizerStatus {
        self.scores.push_back(score);
        if self.scores.len() > self.window {
            self.scores.pop_front();
        }
        if self.scores.len() < self.window {
            return OptimizerStatus::Improving;
        }

        if self.improvement() < self.threshold {
            self.plateau_count += 1;
        } else {
            self.plateau_count = 0;
        }
        self.status()
    }

    pub fn status(&self) -> OptimizerStatus {
        if self.scores.len() < self.window {
            OptimizerStatus::Improving
        } else if self.plateau_count >= 3 {
            OptimizerStatus::Converged
        } else if self.plateau_count > 0 {
            OptimizerStatus::Plateaued
        } else {
            OptimizerStatus::Improving
        }
    }

    fn improvement(&self) -> f64 {
        let (Some(&oldest), Some(&newest)) = (self.scores.front(), self.scores.back()) else {
            return 0.0;
        };
        let gain = if self.minimize {
            oldest - newest
        } else {
            newest - oldest
        };
        gain / oldest.abs().max(f64::EPSILON)
    }
}

/// Per-generation summary.
#[derive(Clone, Debug, Serialize)]
pub struct GenerationReport {
    pub generation: u64,
    /// Best fitness among the survivors of selection.
    pub best: f64,
    pub mean: f64,
    pub survivors: usize,
    /// Population length after crossover.
    pub len: usize,
    pub status: OptimizerStatus,
}

/// Runs a [`Population`] through generations as configured.
pub struct Evolution<G: Genome> {
    population: Population<G>,
    config: EvolutionConfig,
    checkpoint: CheckpointConfig,
    tracker: ConvergenceTracker,
    generation: u64,
}

impl<G: Genome> Evolution<G> {
    pub fn new(population: Population<G>, config: EvolutionConfig) -> Self {
        let tracker = ConvergenceTracker::new(
            config.convergence_window,
            config.convergence_threshold,
            config.minimize,
        );
        Self {
            population,
            config,
            checkpoint: CheckpointConfig::default(),
            tracker,
            generation: 0,
        }
    }

    /// Write checkpoints as configured while running.
    pub fn with_checkpoints(mut self, checkpoint: CheckpointConfig) -> Self {
        self.checkpoint = checkpoint;
        self
    }

    /// Continue numbering generations after `generation`, e.g. when resuming.
    pub fn starting_at(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> &Population<G> {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut Population<G> {
        &mut self.population
    }

    pub fn into_population(self) -> Population<G> {
        self.population
    }

    /// One generation: selection, crossover, mutation.
    pub fn step(&mut self, algorithm: &G::Algorithm) -> Result<GenerationReport> {
        let cfg = &self.config;
        self.population.selection(cfg.minimize, cfg.take);
        let stats = self.population.stats(cfg.minimize)?;
        let survivors = self.population.len();
        let status = self.tracker.record(stats.best);

        self.population.crossover(algorithm, cfg.crossover_gaussian)?;
        let len = self.population.len();
        self.population.mutate(cfg.mutation_rate, cfg.mutation_gaussian)?;

        self.generation += 1;
        let report = GenerationReport {
            generation: self.generation,
            best: stats.best,
            mean: stats.mean,
            survivors,
            len,
            status,
        };
        info!(
            generation = report.generation,
            best = report.best,
            mean = report.mean,
            len = report.len,
            status = %report.status,
            "generation"
        );
        Ok(report)
    }

    /// Run up to `generations` steps, stopping early on convergence when
    /// configured. Checkpoints are written every `checkpoint.every`
    /// generations and after the last one.
    pub fn run(&mut self, algorithm: &G::Algorithm) -> Result<Vec<GenerationReport>> {
        let mut reports = Vec::with_capacity(self.config.generations.min(1024) as usize);
        for _ in 0..self.config.generations {
            let report = self.step(algorithm)?;
            let converged = report.status == OptimizerStatus::Converged;
            let due = self.checkpoint.every > 0 && report.generation % self.checkpoint.every == 0;
            reports.push(report);

            if converged && self.config.stop_on_convergence {
                info!(generation = self.generation, "converged, stopping");
                break;
            }
            if due {
                self.save_checkpoint()?;
            }
        }
        if !reports.is_empty() {
            self.save_checkpoint()?;
        }
        Ok(reports)
    }

    /// Evaluate the current population and persist its states, if a
    /// checkpoint path is configured.
    pub fn save_checkpoint(&mut self) -> Result<Option<CheckpointMeta>> {
        let Some(path) = self.checkpoint.path.clone() else {
            return Ok(None);
        };
        let states = self.population.states();
        let stats = self.population.stats(self.config.minimize)?;
        let count = self.population.count();
        let meta = checkpoint::save(&path, self.generation, count, stats, &states)?;
        Ok(Some(meta))
    }

    /// Evaluate and return the best genome of the current population.
    pub fn best(&mut self) -> Result<&G> {
        self.population.best_creature(self.config.minimize)
    }
}
