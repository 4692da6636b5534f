//! Greedy decoder from random-key chromosomes to feasible selections.

use super::chromosome::Chromosome;
use crate::instance::KnapsackInstance;

/// Result of decoding a chromosome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// `selected[j]` is true when item `j` is packed
    pub selected: Vec<bool>,
    pub total_value: u64,
    pub total_weight: u64,
}

impl Decoded {
    /// Indices of the packed items, ascending
    pub fn selection(&self) -> Vec<usize> {
        self.selected
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Maps chromosomes to knapsack selections.
///
/// Genes are visited in the chromosome's stored order; an item is packed
/// whenever it still fits. Skipped items are never reconsidered.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    instance: &'a KnapsackInstance,
}

impl<'a> Decoder<'a> {
    pub fn new(instance: &'a KnapsackInstance) -> Self {
        Decoder { instance }
    }

    pub fn instance(&self) -> &'a KnapsackInstance {
        self.instance
    }

    /// Decode a chromosome into the full selection.
    pub fn decode(&self, chromosome: &Chromosome) -> Decoded {
        let mut selected = vec![false; self.instance.len()];
        let (total_weight, total_value) = self.pack(chromosome, |item| selected[item] = true);

        Decoded {
            selected,
            total_value,
            total_weight,
        }
    }

    /// Decode a chromosome, keeping only the total value.
    pub fn fitness(&self, chromosome: &Chromosome) -> u64 {
        self.pack(chromosome, |_| {}).1
    }

    fn pack<F: FnMut(usize)>(&self, chromosome: &Chromosome, mut on_pack: F) -> (u64, u64) {
        let capacity = self.instance.capacity;
        let mut total_weight = 0u64;
        let mut total_value = 0u64;

        for gene in chromosome.genes() {
            let item = &self.instance.items[gene.item];
            // total_weight <= capacity always holds, so the subtraction cannot underflow
            if item.weight <= capacity - total_weight {
                on_pack(gene.item);
                total_weight += item.weight;
                total_value += item.value;
            }
        }

        (total_weight, total_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brkga::chromosome::Gene;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    fn small_instance(capacity: u64) -> KnapsackInstance {
        KnapsackInstance::new("small", capacity, &[(5, 10), (4, 40), (6, 30)]).unwrap()
    }

    fn ordered(order: &[usize]) -> Chromosome {
        let n = order.len();
        Chromosome::from_genes(
            order
                .iter()
                .enumerate()
                .map(|(pos, &item)| Gene {
                    key: (n - pos) as f64,
                    item,
                })
                .collect(),
        )
    }

    #[test]
    fn test_greedy_decode_skips_items_that_do_not_fit() {
        let instance = small_instance(10);
        let decoder = Decoder::new(&instance);

        let decoded = decoder.decode(&ordered(&[1, 2, 0]));
        assert_eq!(decoded.selection(), vec![1, 2]);
        assert_eq!(decoded.total_value, 70);
        assert_eq!(decoded.total_weight, 10);
        assert_eq!(decoder.fitness(&ordered(&[1, 2, 0])), 70);
    }

    #[test]
    fn test_decode_is_order_dependent() {
        let instance = small_instance(10);
        let decoder = Decoder::new(&instance);

        // item 0 first blocks item 2
        let decoded = decoder.decode(&ordered(&[0, 1, 2]));
        assert_eq!(decoded.selection(), vec![0, 1]);
        assert_eq!(decoded.total_value, 50);
    }

    #[test]
    fn test_zero_capacity_selects_nothing() {
        let instance = small_instance(0);
        let decoder = Decoder::new(&instance);

        for order in [[0, 1, 2], [2, 1, 0], [1, 0, 2]] {
            let decoded = decoder.decode(&ordered(&order));
            assert!(decoded.selection().is_empty());
            assert_eq!(decoded.total_value, 0);
            assert_eq!(decoded.total_weight, 0);
        }
    }

    #[test]
    fn test_decode_at_value_ceiling() {
        let instance = KnapsackInstance::new("wide", 10, &[(1, u64::MAX - 1), (1, 1)]).unwrap();
        let decoder = Decoder::new(&instance);

        assert_eq!(decoder.fitness(&ordered(&[0, 1])), u64::MAX);
        assert_eq!(decoder.fitness(&ordered(&[1, 0])), u64::MAX);
    }

    #[test]
    fn test_decode_is_feasible_and_idempotent() {
        let instance = KnapsackInstance::new(
            "random",
            50,
            &[(12, 4), (7, 10), (30, 31), (3, 2), (22, 25), (9, 9), (15, 20), (1, 1)],
        )
        .unwrap();
        let decoder = Decoder::new(&instance);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        for _ in 0..100 {
            let c = Chromosome::random(&instance.items, &mut rng);
            let first = decoder.decode(&c);
            let second = decoder.decode(&c);

            assert_eq!(first, second);
            assert!(instance.is_feasible(&first.selected));
            assert_eq!(first.total_value, instance.selection_value(&first.selected));
            assert_eq!(first.total_value, decoder.fitness(&c));
        }
    }
}
