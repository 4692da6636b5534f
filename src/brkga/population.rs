//! Population management: initialization, evaluation and ranking.

use super::chromosome::{Chromosome, Individual};
use super::decoder::Decoder;
use crate::instance::Item;
use rand::prelude::*;
use rayon::prelude::*;

/// One generation of individuals.
///
/// After [`Population::evaluate`] the individuals are ranked by descending
/// fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Create `size` random, unevaluated individuals.
    pub fn random<R: Rng>(items: &[Item], size: usize, rng: &mut R) -> Self {
        let individuals = (0..size)
            .map(|_| Individual::unevaluated(Chromosome::random(items, rng)))
            .collect();
        Population { individuals }
    }

    /// Wrap an already assembled generation.
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Population { individuals }
    }

    /// Decode every unevaluated individual, then rank the population.
    ///
    /// Individuals that are already evaluated keep their cached fitness.
    /// Ranking is a stable sort, so equal fitness values keep their
    /// relative order.
    pub fn evaluate(&mut self, decoder: &Decoder<'_>, parallel: bool) {
        let decode = |ind: &mut Individual| {
            if !ind.evaluated {
                ind.fitness = decoder.fitness(&ind.chromosome);
                ind.evaluated = true;
            }
        };

        if parallel {
            self.individuals.par_iter_mut().for_each(decode);
        } else {
            self.individuals.iter_mut().for_each(decode);
        }

        self.individuals.sort_by(|a, b| b.fitness.cmp(&a.fitness));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Best individual (first after evaluation)
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// The `count` best-ranked individuals
    pub fn elite(&self, count: usize) -> &[Individual] {
        &self.individuals[..count.min(self.len())]
    }

    /// Everything ranked below the first `count` individuals
    pub fn non_elite(&self, count: usize) -> &[Individual] {
        &self.individuals[count.min(self.len())..]
    }

    /// Whether every individual is evaluated and fitness is non-increasing
    pub fn is_ranked(&self) -> bool {
        self.individuals.iter().all(|i| i.evaluated)
            && self.individuals.windows(2).all(|w| w[0].fitness >= w[1].fitness)
    }

    /// Mean fitness over the population
    pub fn mean_fitness(&self) -> f64 {
        if self.individuals.is_empty() {
            return 0.0;
        }
        self.individuals.iter().map(|i| i.fitness as f64).sum::<f64>() / self.len() as f64
    }

    /// Fitness values of the `count` best individuals
    pub fn top_fitness(&self, count: usize) -> Vec<u64> {
        self.elite(count).iter().map(|i| i.fitness).collect()
    }
}
