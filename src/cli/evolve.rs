use std::path::PathBuf;
use std::process;

use clap::Args;

use mllib::checkpoint;
use mllib::experiments::xor::{XorGenome, XorState};
use mllib::ga::Evolution;
use mllib::{Genome, Population, RandomSource};

#[derive(Args)]
pub struct EvolveArgs {
    /// TOML run configuration (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Generations to run (overrides evolution.generations)
    #[arg(short, long)]
    pub generations: Option<u64>,
    /// Random seed (overrides population.seed)
    #[arg(long)]
    pub seed: Option<u64>,
    /// Initial genome count (overrides population.size)
    #[arg(long)]
    pub population: Option<usize>,
    /// Checkpoint file to write (overrides checkpoint.path)
    #[arg(long, value_name = "PATH")]
    pub checkpoint: Option<PathBuf>,
    /// Resume from a checkpoint written by an earlier run
    #[arg(long, value_name = "PATH")]
    pub resume: Option<PathBuf>,
}

pub fn cmd_evolve(args: EvolveArgs) {
    let mut config = super::load_config(args.config.as_deref());
    if let Some(g) = args.generations {
        config.evolution.generations = g;
    }
    if let Some(seed) = args.seed {
        config.population.seed = Some(seed);
    }
    if let Some(size) = args.population {
        config.population.size = size;
    }
    if let Some(path) = args.checkpoint {
        config.checkpoint.path = Some(path);
    }
    if let Err(e) = config.validate() {
        eprintln!("error: {}", e);
        process::exit(1);
    }

    let rng = match config.population.seed {
        Some(seed) => RandomSource::seeded(seed),
        None => RandomSource::from_entropy(),
    };

    let (population, gen_start) = match args.resume {
        Some(ref path) => {
            let ckpt = super::or_exit(checkpoint::load::<XorState>(path), "cannot resume");
            let meta = &ckpt.meta;
            eprintln!(
                "Resuming from {} (generation {}, {} genomes, base count {})",
                path.display(),
                meta.generation,
                meta.count,
                meta.base_count
            );
            let size_given = args.population.is_some() || args.config.is_some();
            if size_given && config.population.size != meta.base_count {
                eprintln!(
                    "  note: population size {} ignored, the checkpoint's base count {} applies",
                    config.population.size, meta.base_count
                );
            }
            let (generation, base_count) = (meta.generation, meta.base_count);
            let genomes = ckpt.states.into_iter().map(XorGenome::from_state);
            (Population::with_count(genomes, base_count, rng), generation)
        }
        None => (
            Population::from_fn(config.population.size, |_, rng| XorGenome::random(rng), rng),
            0,
        ),
    };

    eprintln!(
        "Evolving {} genomes for {} generations ({} crossover, mutation rate {})",
        population.count(),
        config.evolution.generations,
        config.evolution.crossover,
        config.evolution.mutation_rate,
    );

    let start = std::time::Instant::now();
    let mut evolution = Evolution::new(population, config.evolution.clone())
        .with_checkpoints(config.checkpoint.clone())
        .starting_at(gen_start);
    let reports = super::or_exit(evolution.run(&config.evolution.crossover), "evolution failed");
    let elapsed = start.elapsed();

    let best = super::or_exit(evolution.best(), "no genomes left");
    eprintln!();
    eprintln!(
        "Done: {} generations ({:.1}s), best error {:.6}",
        reports.len(),
        elapsed.as_secs_f64(),
        best.fitness(),
    );
    if let Some(last) = reports.last() {
        eprintln!("  status: {}, mean error {:.6}", last.status, last.mean);
    }
    super::print_predictions(best);
    if let Some(path) = &config.checkpoint.path {
        eprintln!("  checkpoint: {}", path.display());
    }
}
