use std::path::PathBuf;

/// Errors surfaced by the substrate, the GA engine and the checkpoint layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `add_volume` was handed a source longer than the destination.
    #[error("length mismatch: source has {source_len} elements, destination has {dest_len}")]
    LengthMismatch { source_len: usize, dest_len: usize },

    #[error("population is empty")]
    EmptyPopulation,

    /// Fitness was read after crossover or mutation without re-evaluating.
    #[error("fitness is stale: evaluate the population before reading fitness")]
    StaleFitness,

    #[error("mutation rate {0} is outside [0, 1]")]
    InvalidRate(f64),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("checkpoint '{path}': {message}")]
    Checkpoint { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn checkpoint(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Checkpoint {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
