//! BRKGA Knapsack Solver Library
//!
//! A Biased Random-Key Genetic Algorithm for the 0/1 knapsack problem.
//!
//! # Features
//!
//! - Density-scaled random-key encoding with a greedy feasibility decoder
//! - Elitism, mutant injection and biased crossover (see [`brkga`])
//! - Optional parallel decoding with rayon
//! - Greedy baselines and an exact dynamic programming solver
//! - Benchmarking tools with CSV export
//!
//! # Example
//!
//! ```no_run
//! use brkga_knapsack::instance::KnapsackInstance;
//! use brkga_knapsack::brkga::{Brkga, BrkgaConfig};
//!
//! // Load instance
//! let instance = KnapsackInstance::from_file("instance.txt").unwrap();
//!
//! // Evolve with default parameters and a fixed seed
//! let config = BrkgaConfig::default().with_seed(42);
//! let mut brkga = Brkga::new(&instance, config).unwrap();
//! let solution = brkga.run();
//!
//! println!("Best value: {}", solution.total_value);
//! ```

pub mod error;
pub mod instance;
pub mod solution;
pub mod brkga;
pub mod heuristics;
pub mod exact;
pub mod benchmark;

pub use instance::KnapsackInstance;
pub use solution::Solution;
