//! Concrete genomes used by the command line, tests and benches.

pub mod xor;
