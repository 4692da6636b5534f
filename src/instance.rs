//! Module for parsing and representing 0/1 knapsack instances.
//!
//! Instance files are whitespace-delimited: the item count `N` and the
//! capacity `C`, followed by `N` records of `id weight value`. The `id`
//! column must be present but is not used; items are indexed by their
//! position in the file.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single item of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Weight (always positive)
    pub weight: u64,
    /// Value collected when the item is packed
    pub value: u64,
    /// Value per unit of weight
    pub density: f64,
}

impl Item {
    /// Create an item, precomputing its density.
    ///
    /// Callers must guarantee `weight > 0`; [`KnapsackInstance::new`] checks it.
    pub fn new(weight: u64, value: u64) -> Self {
        Item {
            weight,
            value,
            density: value as f64 / weight as f64,
        }
    }
}

/// Represents a complete knapsack instance: the item catalog and the capacity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnapsackInstance {
    /// Name of the instance (file stem when loaded from disk)
    pub name: String,
    /// Knapsack capacity
    pub capacity: u64,
    /// Items, indexed 0..N-1
    pub items: Vec<Item>,
}

impl KnapsackInstance {
    /// Build an instance from `(weight, value)` pairs.
    ///
    /// Rejects empty catalogs, zero-weight items, whose density is undefined,
    /// and catalogs whose total weight or value overflows `u64`. Every sum
    /// over a subset of the items is then exact.
    pub fn new(name: &str, capacity: u64, items: &[(u64, u64)]) -> Result<Self, LoadError> {
        if items.is_empty() {
            return Err(LoadError::Empty);
        }

        let items = items
            .iter()
            .enumerate()
            .map(|(index, &(weight, value))| {
                if weight == 0 {
                    Err(LoadError::ZeroWeight { index })
                } else {
                    Ok(Item::new(weight, value))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let checked_total = |field: &'static str, of: fn(&Item) -> u64| {
            items
                .iter()
                .try_fold(0u64, |acc, item| acc.checked_add(of(item)))
                .ok_or(LoadError::TotalOverflow { field })
        };
        checked_total("weight", |i| i.weight)?;
        checked_total("value", |i| i.value)?;

        Ok(KnapsackInstance {
            name: name.to_string(),
            capacity,
            items,
        })
    }

    /// Parse an instance from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Self::parse(&name, &content)
    }

    /// Parse an instance from its textual content
    pub fn parse(name: &str, content: &str) -> Result<Self, LoadError> {
        let mut tokens = content.split_whitespace();

        let declared: usize = header_field(tokens.next(), "item_count")?;
        let capacity: u64 = header_field(tokens.next(), "capacity")?;

        if declared == 0 {
            return Err(LoadError::Empty);
        }

        // The header count is untrusted; a short file fails on its first missing field
        let mut pairs = Vec::with_capacity(declared.min(1 << 16));
        for index in 0..declared {
            let mut next_field = |field: &'static str| -> Result<u64, LoadError> {
                let token = tokens.next().ok_or(LoadError::MissingItemField {
                    index,
                    field,
                    found: index,
                    declared,
                })?;
                token.parse().map_err(|_| LoadError::InvalidItemField {
                    index,
                    field,
                    token: token.to_string(),
                })
            };

            let _id = next_field("id")?;
            let weight = next_field("weight")?;
            let value = next_field("value")?;
            pairs.push((weight, value));
        }

        Self::new(name, capacity, &pairs)
    }

    /// Number of items
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty (never true for a loaded instance)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total weight of a selection mask
    pub fn selection_weight(&self, selected: &[bool]) -> u64 {
        self.items
            .iter()
            .zip(selected)
            .filter(|&(_, &s)| s)
            .map(|(item, _)| item.weight)
            .sum()
    }

    /// Total value of a selection mask
    pub fn selection_value(&self, selected: &[bool]) -> u64 {
        self.items
            .iter()
            .zip(selected)
            .filter(|&(_, &s)| s)
            .map(|(item, _)| item.value)
            .sum()
    }

    /// Verify that a selection respects the capacity
    pub fn is_feasible(&self, selected: &[bool]) -> bool {
        selected.len() == self.len() && self.selection_weight(selected) <= self.capacity
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let total_weight: u64 = self.items.iter().map(|i| i.weight).sum();
        let total_value: u64 = self.items.iter().map(|i| i.value).sum();
        let fitting_items = self.items.iter().filter(|i| i.weight <= self.capacity).count();

        let densities = self.items.iter().map(|i| i.density);
        let min_density = densities.clone().fold(f64::INFINITY, f64::min);
        let max_density = densities.clone().fold(0.0, f64::max);
        let avg_density = densities.sum::<f64>() / self.len() as f64;

        let capacity_ratio = if total_weight > 0 {
            self.capacity as f64 / total_weight as f64
        } else {
            0.0
        };

        InstanceStatistics {
            name: self.name.clone(),
            num_items: self.len(),
            capacity: self.capacity,
            total_weight,
            total_value,
            fitting_items,
            capacity_ratio,
            min_density,
            avg_density,
            max_density,
        }
    }
}

fn header_field<T: std::str::FromStr>(token: Option<&str>, field: &'static str) -> Result<T, LoadError> {
    let token = token.ok_or(LoadError::MissingHeader { field })?;
    token.parse().map_err(|_| LoadError::InvalidHeader {
        field,
        token: token.to_string(),
    })
}

/// Statistics about a knapsack instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub num_items: usize,
    pub capacity: u64,
    pub total_weight: u64,
    pub total_value: u64,
    /// Items that fit in an empty knapsack
    pub fitting_items: usize,
    /// Capacity divided by the weight of all items
    pub capacity_ratio: f64,
    pub min_density: f64,
    pub avg_density: f64,
    pub max_density: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Items: {} ({} fit individually)", self.num_items, self.fitting_items)?;
        writeln!(f, "  Capacity: {}", self.capacity)?;
        writeln!(f, "  Total weight: {}", self.total_weight)?;
        writeln!(f, "  Total value: {}", self.total_value)?;
        writeln!(f, "  Capacity / total weight: {:.2}%", self.capacity_ratio * 100.0)?;
        writeln!(
            f,
            "  Density (value/weight): min {:.3}, avg {:.3}, max {:.3}",
            self.min_density, self.avg_density, self.max_density
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instance() {
        let content = "3 10\n1 5 10\n2 4 40\n3 6 30\n";
        let instance = KnapsackInstance::parse("small", content).unwrap();

        assert_eq!(instance.name, "small");
        assert_eq!(instance.capacity, 10);
        assert_eq!(instance.len(), 3);
        assert_eq!(instance.items[1], Item::new(4, 40));
        assert!((instance.items[0].density - 2.0).abs() < 1e-12);
        assert!((instance.items[1].density - 10.0).abs() < 1e-12);
        assert!((instance.items[2].density - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_ignores_layout_and_trailing_tokens() {
        let content = "2   7 1 3 9\n\n   2 4\n 8 trailing garbage";
        let instance = KnapsackInstance::parse("loose", content).unwrap();
        assert_eq!(instance.capacity, 7);
        assert_eq!(instance.items, vec![Item::new(3, 9), Item::new(4, 8)]);
    }

    #[test]
    fn test_parse_missing_header() {
        let err = KnapsackInstance::parse("x", "").unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader { field: "item_count" }));

        let err = KnapsackInstance::parse("x", "4").unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader { field: "capacity" }));

        let err = KnapsackInstance::parse("x", "4 -1").unwrap_err();
        assert!(matches!(err, LoadError::InvalidHeader { field: "capacity", .. }));
    }

    #[test]
    fn test_parse_fewer_items_than_declared() {
        let err = KnapsackInstance::parse("x", "3 10\n1 5 10\n2 4").unwrap_err();
        match err {
            LoadError::MissingItemField { index, field, found, declared } => {
                assert_eq!(index, 1);
                assert_eq!(field, "value");
                assert_eq!(found, 1);
                assert_eq!(declared, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_invalid_item_field() {
        let err = KnapsackInstance::parse("x", "1 10\n1 five 10").unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidItemField { index: 0, field: "weight", .. }
        ));
    }

    #[test]
    fn test_reject_zero_weight_and_empty() {
        let err = KnapsackInstance::parse("x", "2 10\n1 5 10\n2 0 3").unwrap_err();
        assert!(matches!(err, LoadError::ZeroWeight { index: 1 }));

        let err = KnapsackInstance::parse("x", "0 10").unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn test_parse_huge_declared_count() {
        let err = KnapsackInstance::parse("x", "18446744073709551615 10\n1 1 1").unwrap_err();
        match err {
            LoadError::MissingItemField { index, field, .. } => {
                assert_eq!(index, 1);
                assert_eq!(field, "id");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reject_overflowing_totals() {
        let content = format!("2 10\n1 1 {}\n2 1 1", u64::MAX);
        let err = KnapsackInstance::parse("x", &content).unwrap_err();
        assert!(matches!(err, LoadError::TotalOverflow { field: "value" }));

        let err = KnapsackInstance::new("x", 10, &[(u64::MAX, 1), (1, 1)]).unwrap_err();
        assert!(matches!(err, LoadError::TotalOverflow { field: "weight" }));

        // totals of exactly u64::MAX are still representable
        let instance = KnapsackInstance::new("x", 10, &[(1, u64::MAX - 1), (1, 1)]).unwrap();
        assert_eq!(instance.statistics().total_value, u64::MAX);
        assert_eq!(instance.selection_value(&[true, true]), u64::MAX);
    }

    #[test]
    fn test_from_file_missing() {
        let err = KnapsackInstance::from_file("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_feasibility_and_statistics() {
        let instance = KnapsackInstance::new("t", 10, &[(5, 10), (4, 40), (6, 30)]).unwrap();

        assert!(instance.is_feasible(&[false, true, true]));
        assert!(!instance.is_feasible(&[true, true, true]));
        assert!(!instance.is_feasible(&[true]));
        assert_eq!(instance.selection_value(&[false, true, true]), 70);

        let stats = instance.statistics();
        assert_eq!(stats.total_weight, 15);
        assert_eq!(stats.total_value, 80);
        assert_eq!(stats.fitting_items, 3);
        assert!((stats.max_density - 10.0).abs() < 1e-12);
        assert!((stats.min_density - 2.0).abs() < 1e-12);
    }
}
