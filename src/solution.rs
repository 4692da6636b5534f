//! Solution representation for the knapsack problem.
//!
//! A solution is a set of packed items together with its totals and the
//! bookkeeping (algorithm, time, iterations) reported after a run.

use crate::instance::KnapsackInstance;
use serde::{Deserialize, Serialize};

/// Represents a solution to the knapsack problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Indices of the packed items, ascending
    pub selection: Vec<usize>,
    /// Total value of the packed items
    pub total_value: u64,
    /// Total weight of the packed items
    pub total_weight: u64,
    /// Whether the packed weight respects the capacity
    pub feasible: bool,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations (generations for the BRKGA)
    pub iterations: Option<usize>,
}

impl Solution {
    /// Create a new empty solution
    pub fn new() -> Self {
        Solution {
            selection: Vec::new(),
            total_value: 0,
            total_weight: 0,
            feasible: true,
            algorithm: String::new(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Create a solution from a selection mask (`selected[j]` packs item `j`)
    pub fn from_mask(instance: &KnapsackInstance, selected: &[bool], algorithm: &str) -> Self {
        let selection = selected
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s)
            .map(|(i, _)| i)
            .collect();
        Self::from_selection(instance, selection, algorithm)
    }

    /// Create a solution from item indices
    pub fn from_selection(instance: &KnapsackInstance, mut selection: Vec<usize>, algorithm: &str) -> Self {
        selection.sort_unstable();
        selection.dedup();

        let mut solution = Solution {
            selection,
            algorithm: algorithm.to_string(),
            ..Solution::new()
        };
        solution.validate(instance);
        solution
    }

    /// Recompute totals and feasibility against an instance
    pub fn validate(&mut self, instance: &KnapsackInstance) {
        let in_range = self.selection.iter().all(|&i| i < instance.len());
        let items = self.selection.iter().filter_map(|&i| instance.items.get(i));

        self.total_weight = items.clone().map(|it| it.weight).sum();
        self.total_value = items.map(|it| it.value).sum();
        self.feasible = in_range && self.total_weight <= instance.capacity;
    }

    /// Selection as a mask over the instance's items
    pub fn mask(&self, instance: &KnapsackInstance) -> Vec<bool> {
        let mut mask = vec![false; instance.len()];
        for &i in &self.selection {
            if let Some(slot) = mask.get_mut(i) {
                *slot = true;
            }
        }
        mask
    }

    /// Number of packed items
    pub fn num_selected(&self) -> usize {
        self.selection.len()
    }

    /// Fraction of the capacity used (0 when the capacity is 0)
    pub fn capacity_usage(&self, instance: &KnapsackInstance) -> f64 {
        if instance.capacity == 0 {
            0.0
        } else {
            self.total_weight as f64 / instance.capacity as f64
        }
    }

    /// Relative gap to a reference value in percent (0 when the reference is 0)
    pub fn gap_to(&self, reference: u64) -> f64 {
        if reference == 0 {
            0.0
        } else {
            (reference as f64 - self.total_value as f64) / reference as f64 * 100.0
        }
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Value: {}", self.total_value)?;
        writeln!(f, "  Weight: {}", self.total_weight)?;
        writeln!(f, "  Feasible: {}", self.feasible)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        writeln!(f, "  Items: {:?}", self.selection)
    }
}
