pub mod evolve;
pub mod inspect;

use std::path::Path;
use std::process;

use mllib::experiments::xor::{XorGenome, CASES};
use mllib::EvolveConfig;

/// Load a run configuration, or defaults when no path is given, exiting on error.
pub fn load_config(path: Option<&Path>) -> EvolveConfig {
    let Some(path) = path else {
        return EvolveConfig::default();
    };
    match EvolveConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: cannot load '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

/// Unwrap a library result, printing `error: <context>: <err>` and exiting on failure.
pub fn or_exit<T>(result: mllib::Result<T>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {}: {}", context, e);
            process::exit(1);
        }
    }
}

/// Print the truth table as the genome sees it.
pub fn print_predictions(genome: &XorGenome) {
    for (x, want) in CASES {
        eprintln!(
            "  {} xor {} = {:.4}  (want {})",
            x[0],
            x[1],
            genome.predict(x),
            want
        );
    }
}
