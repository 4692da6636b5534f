//! Exact solvers module.
//!
//! Exact optima serve as reference values for the heuristics: the benchmark
//! reports gaps against them and the tests check that no heuristic beats them.

mod dynamic_programming;

pub use dynamic_programming::*;
