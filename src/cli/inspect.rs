use std::path::PathBuf;

use clap::Args;

use mllib::checkpoint;
use mllib::experiments::xor::{XorGenome, XorState};

#[derive(Args)]
pub struct InspectArgs {
    /// Checkpoint file written by `mllib evolve`
    pub input: PathBuf,
    /// Also print every genome's fitness
    #[arg(long)]
    pub all: bool,
}

pub fn cmd_inspect(args: InspectArgs) {
    let ckpt = super::or_exit(
        checkpoint::load::<XorState>(&args.input),
        "cannot read checkpoint",
    );
    let meta = &ckpt.meta;
    eprintln!("{}", args.input.display());
    eprintln!("  generation:   {}", meta.generation);
    eprintln!("  genomes:      {}", meta.count);
    eprintln!("  best fitness: {:.6}", meta.best_fitness);
    eprintln!("  mean fitness: {:.6}", meta.mean_fitness);
    eprintln!("  state hash:   {}", &meta.state_hash[..meta.state_hash.len().min(16)]);

    if args.all {
        for state in &ckpt.states {
            eprintln!("  #{:<4} {:.6}", state.id, state.fitness);
        }
    }

    let best = ckpt
        .states
        .into_iter()
        .min_by(|a, b| a.fitness.total_cmp(&b.fitness));
    if let Some(state) = best {
        eprintln!("best genome #{}:", state.id);
        super::print_predictions(&XorGenome::from_state(state));
    }
}
