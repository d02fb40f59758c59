use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(
    name = "mllib",
    version,
    about = "Evolve small networks with a genetic algorithm"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evolve XOR network weights
    Evolve(cli::evolve::EvolveArgs),
    /// Print a checkpoint's metadata and best genome
    Inspect(cli::inspect::InspectArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Evolve(args) => cli::evolve::cmd_evolve(args),
        Command::Inspect(args) => cli::inspect::cmd_inspect(args),
    }
}
