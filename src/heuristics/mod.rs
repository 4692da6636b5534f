//! Heuristics module for the knapsack problem.
//!
//! Greedy construction baselines; the BRKGA lives in [`crate::brkga`].

pub mod greedy;

pub use greedy::*;
