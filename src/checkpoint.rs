//! Population checkpoints.
//!
//! A checkpoint is a JSON-lines file: a [`CheckpointMeta`] header followed
//! by one `Genome::State` per line, in population order. The header carries
//! a BLAKE3 digest of the state lines so truncated or edited files are
//! rejected on load.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::ga::FitnessStats;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMeta {
    pub generation: u64,
    /// Construction-time count of the saved population.
    pub base_count: usize,
    /// Number of state lines following the header.
    pub count: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub state_hash: String,
}

/// A loaded checkpoint.
#[derive(Clone, Debug)]
pub struct Checkpoint<S> {
    pub meta: CheckpointMeta,
    pub states: Vec<S>,
}

/// Content hash of serialized state lines.
pub fn hash_states<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hasher = blake3::Hasher::new();
    for line in lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}

/// Serialize `states` with a metadata header to `path`, creating parent
/// directories as needed. `base_count` is the population's construction-time
/// count, needed to resume with the same culling and pairing.
pub fn save<S: Serialize>(
    path: &Path,
    generation: u64,
    base_count: usize,
    stats: FitnessStats,
    states: &[S],
) -> Result<CheckpointMeta> {
    let lines = states
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let meta = CheckpointMeta {
        generation,
        base_count,
        count: lines.len(),
        best_fitness: stats.best,
        mean_fitness: stats.mean,
        state_hash: hash_states(lines.iter().map(String::as_str)),
    };

    let mut content = serde_json::to_string(&meta)?;
    content.push('\n');
    for line in &lines {
        content.push_str(line);
        content.push('\n');
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    info!(path = %path.display(), generation, count = meta.count, "checkpoint saved");
    Ok(meta)
}

/// Read only the header.
pub fn read_meta(path: &Path) -> Result<CheckpointMeta> {
    let content = std::fs::read_to_string(path)?;
    let header = content
        .lines()
        .next()
        .ok_or_else(|| Error::checkpoint(path, "empty file"))?;
    parse_meta(path, header)
}

/// Read and verify a checkpoint.
pub fn load<S: DeserializeOwned>(path: &Path) -> Result<Checkpoint<S>> {
    let content = std::fs::read_to_string(path)?;
    let mut lines = content.lines();
    let header = lines
        .next()
        .ok_or_else(|| Error::checkpoint(path, "empty file"))?;
    let meta = parse_meta(path, header)?;

    let body: Vec<&str> = lines.filter(|l| !l.trim().is_empty()).collect();
    if body.len() != meta.count {
        return Err(Error::checkpoint(
            path,
            format!("expected {} states, found {}", meta.count, body.len()),
        ));
    }
    if hash_states(body.iter().copied()) != meta.state_hash {
        return Err(Error::checkpoint(path, "state hash mismatch"));
    }

    let states = body
        .iter()
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| Error::checkpoint(path, format!("state {}: {}", i, e)))
        })
        .collect::<Result<Vec<S>>>()?;

    Ok(Checkpoint { meta, states })
}

fn parse_meta(path: &Path, header: &str) -> Result<CheckpointMeta> {
    serde_json::from_str(header).map_err(|e| Error::checkpoint(path, format!("bad header: {}", e)))
}
