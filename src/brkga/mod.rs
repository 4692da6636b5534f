//! Biased Random-Key Genetic Algorithm (BRKGA) for the 0/1 knapsack problem.
//!
//! A chromosome holds one random key per item, scaled by the item's
//! value/weight density and kept sorted by descending key. The decoder
//! walks that order and packs every item that still fits, so different key
//! orders explore different feasible selections.
//!
//! Each generation keeps the elite unchanged, injects fresh random mutants
//! and fills the rest with biased crossover between an elite and a
//! non-elite parent, followed by a light per-gene mutation.
//!
//! # References
//!
//! - Bean (1994), "Genetic algorithms and random keys for sequencing and optimization"
//! - Goncalves & Resende (2011), "Biased random-key genetic algorithms for
//!   combinatorial optimization", *J. Heuristics* 17(5), 487-525

mod chromosome;
mod config;
mod decoder;
mod engine;
mod evolution;
mod population;

pub use chromosome::{draw_key, scaled_key, Chromosome, Gene, Individual, KEY_MAX, KEY_MIN};
pub use config::BrkgaConfig;
pub use decoder::{Decoded, Decoder};
pub use engine::{Brkga, GenerationReport, RunState};
pub use evolution::{biased_crossover, evolve};
pub use population::Population;
