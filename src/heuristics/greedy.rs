//! Greedy construction heuristics for the knapsack problem.
//!
//! Each heuristic ranks the items by a fixed priority and packs them in
//! that order with the same greedy decoder the BRKGA uses. Ranking by
//! density is exactly the order the BRKGA's density-scaled keys perturb.

use crate::brkga::{Chromosome, Decoder, Gene};
use crate::instance::{Item, KnapsackInstance};
use crate::solution::Solution;

/// Common interface of construction heuristics
pub trait ConstructionHeuristic {
    fn construct(&self, instance: &KnapsackInstance) -> Solution;
    fn name(&self) -> &str;
}

/// Item priority used by [`GreedyHeuristic`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreedyCriterion {
    /// Highest value/weight first
    Density,
    /// Highest value first
    Value,
    /// Lightest item first
    Weight,
}

impl GreedyCriterion {
    fn priority(&self, item: &Item) -> f64 {
        match self {
            GreedyCriterion::Density => item.density,
            GreedyCriterion::Value => item.value as f64,
            GreedyCriterion::Weight => -(item.weight as f64),
        }
    }
}

/// Packs items in decreasing priority while they fit
pub struct GreedyHeuristic {
    pub criterion: GreedyCriterion,
    name: String,
}

impl GreedyHeuristic {
    pub fn new(criterion: GreedyCriterion) -> Self {
        GreedyHeuristic {
            criterion,
            name: format!("Greedy{:?}", criterion),
        }
    }

    pub fn density() -> Self {
        Self::new(GreedyCriterion::Density)
    }
}

impl Default for GreedyHeuristic {
    fn default() -> Self {
        Self::density()
    }
}

impl ConstructionHeuristic for GreedyHeuristic {
    fn construct(&self, instance: &KnapsackInstance) -> Solution {
        let start = std::time::Instant::now();

        let chromosome = Chromosome::from_genes(
            instance
                .items
                .iter()
                .enumerate()
                .map(|(item, it)| Gene {
                    key: self.criterion.priority(it),
                    item,
                })
                .collect(),
        );
        let decoded = Decoder::new(instance).decode(&chromosome);

        let mut sol = Solution::from_mask(instance, &decoded.selected, self.name());
        sol.computation_time = start.elapsed().as_secs_f64();
        sol
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Runs several heuristics and keeps the best solution
pub struct MultiStartConstruction {
    heuristics: Vec<Box<dyn ConstructionHeuristic + Send + Sync>>,
}

impl MultiStartConstruction {
    pub fn new() -> Self {
        MultiStartConstruction {
            heuristics: Vec::new(),
        }
    }

    pub fn with_all_heuristics() -> Self {
        let heuristics: Vec<Box<dyn ConstructionHeuristic + Send + Sync>> = vec![
            Box::new(GreedyHeuristic::new(GreedyCriterion::Density)),
            Box::new(GreedyHeuristic::new(GreedyCriterion::Value)),
            Box::new(GreedyHeuristic::new(GreedyCriterion::Weight)),
        ];

        MultiStartConstruction { heuristics }
    }

    pub fn add_heuristic<H: ConstructionHeuristic + Send + Sync + 'static>(&mut self, h: H) {
        self.heuristics.push(Box::new(h));
    }
}

impl Default for MultiStartConstruction {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructionHeuristic for MultiStartConstruction {
    fn construct(&self, instance: &KnapsackInstance) -> Solution {
        let start = std::time::Instant::now();

        let mut best = self
            .heuristics
            .iter()
            .map(|h| h.construct(instance))
            .filter(|s| s.feasible)
            .fold(None::<Solution>, |best, s| match best {
                Some(b) if b.total_value >= s.total_value => Some(b),
                _ => Some(s),
            })
            .unwrap_or_else(|| Solution {
                algorithm: self.name().to_string(),
                ..Solution::new()
            });

        best.computation_time = start.elapsed().as_secs_f64();
        best
    }

    fn name(&self) -> &str {
        "MultiStart"
    }
}
