//! Generation transition: elitism, mutants and biased crossover.

use super::chromosome::{Chromosome, Individual};
use super::config::BrkgaConfig;
use super::population::Population;
use crate::instance::Item;
use rand::prelude::*;

/// Biased crossover between an elite and a non-elite parent.
///
/// The child starts as a copy of the elite parent. From a random cut point
/// in `[1, N-1]` onwards each position keeps the elite key with
/// probability `rhoe` and otherwise takes the non-elite parent's key at the
/// same position. Item indices always follow the elite parent, so the child
/// still holds every item exactly once. Keys are re-sorted afterwards.
pub fn biased_crossover<R: Rng>(
    elite: &Chromosome,
    non_elite: &Chromosome,
    rhoe: f64,
    rng: &mut R,
) -> Chromosome {
    let mut child = elite.clone();
    let n = child.len();

    // a single gene leaves no position to recombine
    if n < 2 {
        return child;
    }

    let cut = rng.gen_range(1..n);
    let donor = non_elite.genes();
    for (i, gene) in child.genes_mut().iter_mut().enumerate().skip(cut) {
        if rng.gen::<f64>() >= rhoe {
            gene.key = donor[i].key;
        }
    }

    child.sort();
    child
}

/// Build the next generation from a ranked population.
///
/// Elites are copied with their fitness; mutants are drawn next, then the
/// crossover offspring, each mutated gene by gene. Everything except the
/// elites comes back unevaluated.
pub fn evolve<R: Rng>(
    population: &Population,
    items: &[Item],
    config: &BrkgaConfig,
    rng: &mut R,
) -> Population {
    let size = population.len();
    let elite_count = config.elite_count().min(size);
    let mutant_count = config.mutant_count().min(size - elite_count);
    let crossover_count = size - elite_count - mutant_count;

    let mut next = Vec::with_capacity(size);

    next.extend(population.elite(elite_count).iter().cloned());

    for _ in 0..mutant_count {
        next.push(Individual::unevaluated(Chromosome::random(items, rng)));
    }

    let elites = population.elite(elite_count);
    let others = population.non_elite(elite_count);
    for _ in 0..crossover_count {
        let elite = &elites[rng.gen_range(0..elites.len())];
        let other = &others[rng.gen_range(0..others.len())];

        let mut child = biased_crossover(
            &elite.chromosome,
            &other.chromosome,
            config.elite_inheritance_prob,
            rng,
        );
        child.mutate(items, config.gene_mutation_prob, rng);
        next.push(Individual::unevaluated(child));
    }

    Population::from_individuals(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brkga::chromosome::Gene;
    use crate::brkga::decoder::Decoder;
    use crate::instance::KnapsackInstance;
    use rand_chacha::ChaCha8Rng;

    fn instance() -> KnapsackInstance {
        KnapsackInstance::new(
            "evo",
            60,
            &[
                (12, 4), (7, 10), (30, 31), (3, 2), (22, 25),
                (9, 9), (15, 20), (1, 1), (18, 30), (25, 26),
            ],
        )
        .unwrap()
    }

    fn chromosome(keys: &[f64]) -> Chromosome {
        Chromosome::from_genes(
            keys.iter()
                .enumerate()
                .map(|(item, &key)| Gene { key, item })
                .collect(),
        )
    }

    #[test]
    fn test_crossover_full_inheritance_copies_elite() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let elite = chromosome(&[0.9, 0.8, 0.7, 0.6, 0.5]);
        let other = chromosome(&[0.1, 0.2, 0.3, 0.4, 0.45]);

        for _ in 0..20 {
            let child = biased_crossover(&elite, &other, 1.0, &mut rng);
            assert_eq!(child, elite);
        }
    }

    #[test]
    fn test_crossover_keeps_prefix_and_takes_donor_keys() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let elite = chromosome(&[0.9, 0.8, 0.7, 0.6, 0.5]);
        let other = chromosome(&[0.01, 0.02, 0.03, 0.04, 0.05]);

        for _ in 0..20 {
            let child = biased_crossover(&elite, &other, 0.0, &mut rng);
            assert!(child.is_sorted());
            assert!(child.is_permutation_of(5));

            // position 0 is before any cut point, so the best elite gene survives
            assert_eq!(child.genes()[0], elite.genes()[0]);

            // every key comes either from the elite prefix or from the donor
            for gene in child.genes() {
                let from_elite = elite.genes().iter().any(|g| g == gene);
                let from_donor = other.genes().iter().any(|g| g.key == gene.key);
                assert!(from_elite || from_donor);
            }
            // at least the last position was replaced
            assert!(child.genes().iter().any(|g| g.key < 0.1));
        }
    }

    #[test]
    fn test_crossover_inherits_elite_keys_with_rhoe() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let rhoe = 0.7;
        let trials = 10_000;

        // two genes: the cut is always 1, so only the last position recombines
        let elite = chromosome(&[0.9, 0.8]);
        let other = chromosome(&[0.2, 0.1]);
        let kept = (0..trials)
            .filter(|_| {
                let child = biased_crossover(&elite, &other, rhoe, &mut rng);
                child.genes()[1].key == 0.8
            })
            .count();
        let share = kept as f64 / trials as f64;
        assert!((share - rhoe).abs() < 0.03, "elite share {share}");

        // longer chromosomes: a uniform cut in [1, n-1] leaves n/2 positions on average
        let n = 20;
        let elite = chromosome(&(0..n).map(|i| 0.99 - i as f64 * 0.02).collect::<Vec<_>>());
        let other = chromosome(&(0..n).map(|i| 0.2 - i as f64 * 0.005).collect::<Vec<_>>());
        let trials = 5_000;
        let donated: usize = (0..trials)
            .map(|_| {
                let child = biased_crossover(&elite, &other, rhoe, &mut rng);
                child.genes().iter().filter(|g| g.key < 0.3).count()
            })
            .sum();
        let tail_positions = trials as f64 * n as f64 / 2.0;
        let donor_share = donated as f64 / tail_positions;
        assert!((donor_share - (1.0 - rhoe)).abs() < 0.03, "donor share {donor_share}");
    }

    #[test]
    fn test_crossover_single_gene() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let elite = chromosome(&[0.4]);
        let other = chromosome(&[0.2]);
        assert_eq!(biased_crossover(&elite, &other, 0.0, &mut rng), elite);
    }

    #[test]
    fn test_evolve_partitions_population() {
        let instance = instance();
        let decoder = Decoder::new(&instance);
        let config = BrkgaConfig::default().with_population_size(20);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let mut population = Population::random(&instance.items, 20, &mut rng);
        population.evaluate(&decoder, false);

        let next = evolve(&population, &instance.items, &config, &mut rng);
        assert_eq!(next.len(), 20);

        let elite_count = config.elite_count();
        assert_eq!(next.elite(elite_count), population.elite(elite_count));
        for ind in next.non_elite(elite_count) {
            assert!(!ind.evaluated);
            assert_eq!(ind.fitness, 0);
            assert!(ind.chromosome.is_sorted());
            assert!(ind.chromosome.is_permutation_of(instance.len()));
        }
    }

    #[test]
    fn test_evolve_without_crossover() {
        let instance = instance();
        let decoder = Decoder::new(&instance);
        let config = BrkgaConfig::default()
            .with_population_size(10)
            .with_elite_fraction(0.5)
            .with_mutant_fraction(0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let mut population = Population::random(&instance.items, 10, &mut rng);
        population.evaluate(&decoder, false);

        let next = evolve(&population, &instance.items, &config, &mut rng);
        assert_eq!(next.len(), 10);
        assert_eq!(next.individuals().iter().filter(|i| !i.evaluated).count(), 5);
    }
}
