//! Error types for instance loading, solver configuration and exact solving.

use thiserror::Error;

/// Failure while reading or validating a knapsack instance.
///
/// Every variant is fatal: no population work starts on an instance that
/// failed to load.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read instance {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing header field `{field}`")]
    MissingHeader { field: &'static str },

    #[error("Invalid header field `{field}`: {token:?} is not a valid number")]
    InvalidHeader { field: &'static str, token: String },

    #[error("Instance declares no items")]
    Empty,

    #[error("Item {index}: missing field `{field}` ({found} of {declared} items read)")]
    MissingItemField {
        index: usize,
        field: &'static str,
        found: usize,
        declared: usize,
    },

    #[error("Item {index}: invalid field `{field}`: {token:?} is not a valid number")]
    InvalidItemField {
        index: usize,
        field: &'static str,
        token: String,
    },

    #[error("Item {index}: weight must be positive")]
    ZeroWeight { index: usize },

    #[error("Total item {field} exceeds {max}", max = u64::MAX)]
    TotalOverflow { field: &'static str },
}

/// Invalid BRKGA parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Population size must be at least 2 (got {0})")]
    PopulationTooSmall(usize),

    #[error("{name} must lie in [0, 1] (got {value})")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("elite_fraction ({elite}) + mutant_fraction ({mutant}) must not exceed 1.0")]
    FractionsExceedOne { elite: f64, mutant: f64 },

    #[error("Crossover needs at least one elite individual (population {population}, elite_fraction {elite_fraction})")]
    NoElite {
        population: usize,
        elite_fraction: f64,
    },

}

/// Failure of the exact solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExactError {
    #[error("Instance too large for dynamic programming: {cells} table cells (limit {limit})")]
    TooLarge { cells: u128, limit: u128 },
}
