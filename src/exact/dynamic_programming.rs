//! Exact solver for the 0/1 knapsack problem by dynamic programming.
//!
//! Runs in O(N * C) time and keeps one decision bit per (item, capacity)
//! cell to rebuild the optimal selection, so instances whose table exceeds
//! the configured cell limit are refused instead of exhausting memory.

use crate::error::ExactError;
use crate::instance::KnapsackInstance;
use crate::solution::Solution;
use std::time::Instant;

/// Default table size limit (items x (capacity + 1))
pub const DEFAULT_MAX_CELLS: u128 = 200_000_000;

/// Dynamic programming solver configuration
#[derive(Debug, Clone)]
pub struct DynamicProgrammingSolver {
    /// Largest table the solver agrees to build
    pub max_cells: u128,
}

impl DynamicProgrammingSolver {
    pub fn new() -> Self {
        DynamicProgrammingSolver {
            max_cells: DEFAULT_MAX_CELLS,
        }
    }

    pub fn with_max_cells(max_cells: u128) -> Self {
        DynamicProgrammingSolver { max_cells }
    }

    /// Number of table cells needed for an instance
    pub fn cells(instance: &KnapsackInstance) -> u128 {
        instance.len() as u128 * (instance.capacity as u128 + 1)
    }

    /// Whether the instance fits within the cell limit
    pub fn accepts(&self, instance: &KnapsackInstance) -> bool {
        Self::cells(instance) <= self.max_cells
    }

    /// Solve to optimality
    pub fn solve(&self, instance: &KnapsackInstance) -> Result<Solution, ExactError> {
        let cells = Self::cells(instance);
        if cells > self.max_cells {
            return Err(ExactError::TooLarge {
                cells,
                limit: self.max_cells,
            });
        }

        let start = Instant::now();
        let width = instance.capacity as usize + 1;
        let mut best = vec![0u64; width];
        let mut take = vec![false; instance.len() * width];

        for (i, item) in instance.items.iter().enumerate() {
            let w = item.weight as usize;
            if w >= width {
                continue;
            }
            let row = &mut take[i * width..(i + 1) * width];
            for c in (w..width).rev() {
                let candidate = best[c - w] + item.value;
                if candidate > best[c] {
                    best[c] = candidate;
                    row[c] = true;
                }
            }
        }

        let mut selection = Vec::new();
        let mut c = width - 1;
        for i in (0..instance.len()).rev() {
            if take[i * width + c] {
                selection.push(i);
                c -= instance.items[i].weight as usize;
            }
        }

        let mut solution = Solution::from_selection(instance, selection, "DynamicProgramming");
        solution.computation_time = start.elapsed().as_secs_f64();

        log::debug!(
            "[DP] {} items, capacity {}: optimum {} in {:.4}s",
            instance.len(),
            instance.capacity,
            solution.total_value,
            solution.computation_time
        );

        Ok(solution)
    }
}

impl Default for DynamicProgrammingSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exhaustive search over all subsets, for cross-checking
    fn brute_force(instance: &KnapsackInstance) -> u64 {
        let n = instance.len();
        (0u32..(1 << n))
            .filter_map(|mask| {
                let selected: Vec<bool> = (0..n).map(|i| mask & (1 << i) != 0).collect();
                instance
                    .is_feasible(&selected)
                    .then(|| instance.selection_value(&selected))
            })
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_small_scenario_optimum() {
        let instance = KnapsackInstance::new("s", 10, &[(5, 10), (4, 40), (6, 30)]).unwrap();
        let solution = DynamicProgrammingSolver::new().solve(&instance).unwrap();

        assert_eq!(solution.total_value, 70);
        assert_eq!(solution.selection, vec![1, 2]);
        assert!(solution.feasible);
    }

    #[test]
    fn test_matches_brute_force() {
        let instance = KnapsackInstance::new(
            "bf",
            50,
            &[(12, 4), (7, 10), (30, 31), (3, 2), (22, 25), (9, 9), (15, 20), (1, 1), (18, 30), (25, 26)],
        )
        .unwrap();
        let solution = DynamicProgrammingSolver::new().solve(&instance).unwrap();

        assert!(solution.feasible);
        assert_eq!(solution.total_value, brute_force(&instance));
    }

    #[test]
    fn test_zero_capacity_and_oversized_items() {
        let instance = KnapsackInstance::new("z", 0, &[(1, 5), (2, 7)]).unwrap();
        let solution = DynamicProgrammingSolver::new().solve(&instance).unwrap();
        assert!(solution.selection.is_empty());
        assert_eq!(solution.total_value, 0);

        let instance = KnapsackInstance::new("o", 3, &[(10, 50), (3, 1)]).unwrap();
        let solution = DynamicProgrammingSolver::new().solve(&instance).unwrap();
        assert_eq!(solution.selection, vec![1]);
    }

    #[test]
    fn test_cell_limit() {
        let instance = KnapsackInstance::new("big", 1_000_000, &[(1, 1), (2, 2)]).unwrap();
        let solver = DynamicProgrammingSolver::with_max_cells(1000);
        assert!(!solver.accepts(&instance));
        assert_eq!(
            solver.solve(&instance),
            Err(ExactError::TooLarge { cells: 2_000_002, limit: 1000 })
        );
    }
}
