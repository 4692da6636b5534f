//! BRKGA configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Configuration for the BRKGA
///
/// The population of every generation is split into
/// `floor(P * elite_fraction)` elites, `floor(P * mutant_fraction)` mutants
/// and crossover offspring for the remainder.
///
/// ```
/// use brkga_knapsack::brkga::BrkgaConfig;
///
/// let config = BrkgaConfig::default()
///     .with_population_size(200)
///     .with_elite_fraction(0.25)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.elite_count(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrkgaConfig {
    /// Population size (P)
    pub population_size: usize,
    /// Fraction of the population kept as elite (pe)
    pub elite_fraction: f64,
    /// Fraction of the population replaced by random mutants (pm)
    pub mutant_fraction: f64,
    /// Probability that an offspring keeps the elite parent's key (rhoe)
    pub elite_inheritance_prob: f64,
    /// Number of generations (G); the run always performs all of them
    pub max_generations: usize,
    /// Per-gene probability of redrawing a key in crossover offspring
    pub gene_mutation_prob: f64,
    /// Random seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Decode individuals in parallel with rayon
    pub parallel: bool,
    /// How many of the best fitness values to log per generation at debug level
    pub report_top: usize,
}

impl Default for BrkgaConfig {
    fn default() -> Self {
        BrkgaConfig {
            population_size: 100,
            elite_fraction: 0.3,
            mutant_fraction: 0.2,
            elite_inheritance_prob: 0.7,
            max_generations: 200,
            gene_mutation_prob: 0.05,
            seed: None,
            parallel: false,
            report_top: 10,
        }
    }
}

impl BrkgaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_elite_fraction(mut self, f: f64) -> Self {
        self.elite_fraction = f;
        self
    }

    pub fn with_mutant_fraction(mut self, f: f64) -> Self {
        self.mutant_fraction = f;
        self
    }

    pub fn with_elite_inheritance_prob(mut self, p: f64) -> Self {
        self.elite_inheritance_prob = p;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_gene_mutation_prob(mut self, p: f64) -> Self {
        self.gene_mutation_prob = p;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of elite individuals carried over each generation
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elite_fraction).floor() as usize
    }

    /// Number of fresh random mutants per generation
    pub fn mutant_count(&self) -> usize {
        (self.population_size as f64 * self.mutant_fraction).floor() as usize
    }

    /// Number of crossover offspring per generation
    pub fn crossover_count(&self) -> usize {
        self.population_size
            .saturating_sub(self.elite_count() + self.mutant_count())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }

        for (name, value) in [
            ("elite_fraction", self.elite_fraction),
            ("mutant_fraction", self.mutant_fraction),
            ("elite_inheritance_prob", self.elite_inheritance_prob),
            ("gene_mutation_prob", self.gene_mutation_prob),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }

        if self.elite_fraction + self.mutant_fraction > 1.0 + f64::EPSILON
            || self.elite_count() + self.mutant_count() > self.population_size
        {
            return Err(ConfigError::FractionsExceedOne {
                elite: self.elite_fraction,
                mutant: self.mutant_fraction,
            });
        }

        // With offspring to breed, elite + mutants < P, so a non-elite
        // parent always exists; only the elite side can be empty.
        if self.crossover_count() > 0 && self.elite_count() == 0 {
            return Err(ConfigError::NoElite {
                population: self.population_size,
                elite_fraction: self.elite_fraction,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrkgaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.elite_count(), 30);
        assert_eq!(config.mutant_count(), 20);
        assert_eq!(config.crossover_count(), 50);
        assert_eq!(config.max_generations, 200);
        assert!((config.gene_mutation_prob - 0.05).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_counts_use_floor() {
        let config = BrkgaConfig::default()
            .with_population_size(7)
            .with_elite_fraction(0.3)
            .with_mutant_fraction(0.2);
        assert_eq!(config.elite_count(), 2);
        assert_eq!(config.mutant_count(), 1);
        assert_eq!(config.crossover_count(), 4);
    }

    #[test]
    fn test_validate_fractions_sum() {
        let config = BrkgaConfig::default()
            .with_elite_fraction(0.6)
            .with_mutant_fraction(0.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FractionsExceedOne { .. })
        ));
    }

    #[test]
    fn test_validate_fractions_summing_to_one() {
        // no crossover offspring at all: every slot is elite or mutant
        let config = BrkgaConfig::default()
            .with_elite_fraction(0.5)
            .with_mutant_fraction(0.5);
        assert_eq!(config.crossover_count(), 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_parents() {
        let config = BrkgaConfig::default().with_elite_fraction(0.0);
        assert!(matches!(config.validate(), Err(ConfigError::NoElite { .. })));

        let config = BrkgaConfig::default()
            .with_population_size(2)
            .with_elite_fraction(0.5)
            .with_mutant_fraction(0.0);
        assert!(config.validate().is_ok());

        let config = BrkgaConfig::default()
            .with_population_size(1)
            .with_elite_fraction(0.5);
        assert_eq!(config.validate(), Err(ConfigError::PopulationTooSmall(1)));
    }

    #[test]
    fn test_all_elite_population_breeds_nothing() {
        let config = BrkgaConfig::default()
            .with_elite_fraction(1.0)
            .with_mutant_fraction(0.0);
        assert_eq!(config.elite_count(), config.population_size);
        assert_eq!(config.crossover_count(), 0);
        assert!(config.validate().is_ok());

        // any offspring slot leaves room for a non-elite parent
        let config = BrkgaConfig::default()
            .with_population_size(10)
            .with_elite_fraction(0.9)
            .with_mutant_fraction(0.0);
        assert_eq!(config.crossover_count(), 1);
        assert!(config.validate().is_ok());
        assert_eq!(config.population_size - config.elite_count(), 1);
    }

    #[test]
    fn test_validate_ranges() {
        let config = BrkgaConfig::default().with_elite_inheritance_prob(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { name: "elite_inheritance_prob", .. })
        ));

        let config = BrkgaConfig::default().with_gene_mutation_prob(-0.1);
        assert!(config.validate().is_err());
    }
}
