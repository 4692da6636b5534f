//! Random-key chromosomes.

use crate::instance::Item;
use ordered_float::OrderedFloat;
use rand::prelude::*;
use std::cmp::Reverse;

/// Lower bound of a raw random key, before density scaling
pub const KEY_MIN: f64 = 0.001;
/// Upper bound of a raw random key, before density scaling
pub const KEY_MAX: f64 = 0.999;

/// Draw a raw key uniformly from `[KEY_MIN, KEY_MAX)`.
#[inline]
pub fn draw_key<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(KEY_MIN..KEY_MAX)
}

/// Draw a fresh key for `item`, scaled by its density.
#[inline]
pub fn scaled_key<R: Rng>(item: &Item, rng: &mut R) -> f64 {
    draw_key(rng) * item.density
}

/// One random key bound to an item of the catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gene {
    /// Priority of the item: a raw key scaled by the item's density
    pub key: f64,
    /// Index into the item catalog
    pub item: usize,
}

/// A random-key vector holding exactly one gene per item.
///
/// Genes are kept sorted by descending key (larger item index first on
/// ties); the decoder relies on that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome {
    genes: Vec<Gene>,
}

impl Chromosome {
    /// Build a chromosome with fresh keys, one per item in catalog order.
    pub fn random<R: Rng>(items: &[Item], rng: &mut R) -> Self {
        let genes = items
            .iter()
            .enumerate()
            .map(|(item, it)| Gene {
                key: scaled_key(it, rng),
                item,
            })
            .collect();
        Self::from_genes(genes)
    }

    /// Build a chromosome from arbitrary genes, restoring the key order.
    pub fn from_genes(genes: Vec<Gene>) -> Self {
        let mut chromosome = Chromosome { genes };
        chromosome.sort();
        chromosome
    }

    /// Genes in decoding order
    #[inline]
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Item indices in decoding order
    pub fn order(&self) -> Vec<usize> {
        self.genes.iter().map(|g| g.item).collect()
    }

    /// Whether keys are non-increasing
    pub fn is_sorted(&self) -> bool {
        self.genes.windows(2).all(|w| w[0].key >= w[1].key)
    }

    /// Whether every item index in `0..n` appears exactly once
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.genes.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for gene in &self.genes {
            if gene.item >= n || seen[gene.item] {
                return false;
            }
            seen[gene.item] = true;
        }
        true
    }

    /// Redraw each key independently with probability `prob`, then re-sort.
    ///
    /// A redrawn key is scaled by the density of the item it belongs to.
    pub fn mutate<R: Rng>(&mut self, items: &[Item], prob: f64, rng: &mut R) {
        for gene in &mut self.genes {
            if rng.gen::<f64>() < prob {
                gene.key = scaled_key(&items[gene.item], rng);
            }
        }
        self.sort();
    }

    pub(crate) fn genes_mut(&mut self) -> &mut [Gene] {
        &mut self.genes
    }

    pub(crate) fn sort(&mut self) {
        self.genes
            .sort_by_key(|g| Reverse((OrderedFloat(g.key), g.item)));
    }
}

/// A chromosome tagged with its cached fitness
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub chromosome: Chromosome,
    /// Total value of the decoded selection; 0 until evaluated
    pub fitness: u64,
    /// Whether `fitness` reflects the current chromosome
    pub evaluated: bool,
}

impl Individual {
    /// Wrap a chromosome that has not been decoded yet.
    pub fn unevaluated(chromosome: Chromosome) -> Self {
        Individual {
            chromosome,
            fitness: 0,
            evaluated: false,
        }
    }
}
