//! Benchmarking and experimentation module for the knapsack solvers.
//!
//! Provides tools for running experiments, collecting statistics,
//! and comparing algorithm performance.

use crate::brkga::{Brkga, BrkgaConfig};
use crate::exact::{DynamicProgrammingSolver, DEFAULT_MAX_CELLS};
use crate::heuristics::greedy::*;
use crate::instance::KnapsackInstance;
use crate::solution::Solution;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Result of running a single algorithm on an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    /// Algorithm name
    pub algorithm: String,
    /// Instance name
    pub instance: String,
    /// Number of items
    pub num_items: usize,
    /// Instance capacity
    pub capacity: u64,
    /// Solution value
    pub value: u64,
    /// Whether solution is feasible
    pub feasible: bool,
    /// Computation time in seconds
    pub time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
    /// Gap to best known in percent (if available)
    pub gap_to_best: Option<f64>,
}

/// Aggregated statistics for an algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    /// Algorithm name
    pub algorithm: String,
    /// Number of recorded runs
    pub num_runs: usize,
    /// Number of feasible solutions
    pub num_feasible: usize,
    /// Average value
    pub avg_value: f64,
    /// Best value
    pub best_value: u64,
    /// Worst value
    pub worst_value: u64,
    /// Sample standard deviation of the value
    pub std_value: f64,
    /// Average time
    pub avg_time: f64,
    /// Total time
    pub total_time: f64,
    /// Average gap to best known
    pub avg_gap: Option<f64>,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of seeded BRKGA runs per instance (seeds 0..num_runs)
    pub num_runs: usize,
    /// BRKGA parameters; the seed is overridden per run
    pub brkga: BrkgaConfig,
    /// Run the exact solver to get reference optima
    pub run_exact: bool,
    /// Table size limit for the exact solver
    pub exact_max_cells: u128,
    /// Run the seeded BRKGA runs in parallel
    pub parallel: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            brkga: BrkgaConfig::default(),
            run_exact: true,
            exact_max_cells: DEFAULT_MAX_CELLS,
            parallel: true,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<AlgorithmResult>,
    best_known: HashMap<String, u64>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
            best_known: HashMap::new(),
        }
    }

    /// Set best known value for an instance
    pub fn set_best_known(&mut self, instance_name: &str, value: u64) {
        self.best_known.insert(instance_name.to_string(), value);
    }

    /// Run all construction heuristics on an instance
    pub fn run_construction_heuristics(&mut self, instance: &KnapsackInstance) {
        let heuristics: Vec<Box<dyn ConstructionHeuristic + Send + Sync>> = vec![
            Box::new(GreedyHeuristic::new(GreedyCriterion::Density)),
            Box::new(GreedyHeuristic::new(GreedyCriterion::Value)),
            Box::new(GreedyHeuristic::new(GreedyCriterion::Weight)),
        ];

        for heuristic in heuristics {
            let solution = heuristic.construct(instance);
            self.record_result(instance, &solution);
        }
    }

    /// Run the BRKGA once per seed
    pub fn run_brkga(&mut self, instance: &KnapsackInstance) {
        let template = self.config.brkga.clone();
        let run = |seed: u64| -> Option<Solution> {
            let config = template.clone().with_seed(seed).with_parallel(false);
            match Brkga::new(instance, config) {
                Ok(mut brkga) => {
                    let mut solution = brkga.run();
                    solution.algorithm = format!("BRKGA-run{}", seed);
                    Some(solution)
                }
                Err(e) => {
                    log::error!("Invalid BRKGA configuration: {}", e);
                    None
                }
            }
        };

        let seeds: Vec<u64> = (0..self.config.num_runs as u64).collect();
        let solutions: Vec<Option<Solution>> = if self.config.parallel {
            seeds.par_iter().map(|&s| run(s)).collect()
        } else {
            seeds.iter().map(|&s| run(s)).collect()
        };

        for solution in solutions.into_iter().flatten() {
            self.record_result(instance, &solution);
        }
    }

    /// Run the exact solver; its optimum becomes the best known value
    pub fn run_exact(&mut self, instance: &KnapsackInstance) -> Option<Solution> {
        let solver = DynamicProgrammingSolver::with_max_cells(self.config.exact_max_cells);

        match solver.solve(instance) {
            Ok(solution) => {
                self.set_best_known(&instance.name, solution.total_value);
                self.record_result(instance, &solution);
                Some(solution)
            }
            Err(e) => {
                log::warn!("Exact solver skipped on {}: {}", instance.name, e);
                None
            }
        }
    }

    /// Run full benchmark on an instance
    pub fn run_full_benchmark(&mut self, instance: &KnapsackInstance) {
        log::info!("Running benchmark on instance: {}", instance.name);

        if self.config.run_exact {
            self.run_exact(instance);
        }

        self.run_construction_heuristics(instance);

        self.run_brkga(instance);
    }

    /// Run benchmark on multiple instances
    pub fn run_on_instances(&mut self, instances: &[KnapsackInstance]) {
        for instance in instances {
            self.run_full_benchmark(instance);
        }
    }

    /// Record a result
    fn record_result(&mut self, instance: &KnapsackInstance, solution: &Solution) {
        let gap_to_best = self
            .best_known
            .get(&instance.name)
            .map(|&best| solution.gap_to(best));

        self.results.push(AlgorithmResult {
            algorithm: solution.algorithm.clone(),
            instance: instance.name.clone(),
            num_items: instance.len(),
            capacity: instance.capacity,
            value: solution.total_value,
            feasible: solution.feasible,
            time: solution.computation_time,
            iterations: solution.iterations,
            gap_to_best,
        });
    }

    /// Compute statistics for each algorithm
    ///
    /// Seeded BRKGA runs (`BRKGA-run<k>`) are pooled under `BRKGA`.
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut stats_map: HashMap<String, Vec<&AlgorithmResult>> = HashMap::new();

        for result in &self.results {
            stats_map
                .entry(algorithm_family(&result.algorithm).to_string())
                .or_default()
                .push(result);
        }

        let mut statistics = Vec::new();

        for (algo, results) in stats_map {
            let feasible_results: Vec<_> = results.iter().filter(|r| r.feasible).collect();

            if feasible_results.is_empty() {
                continue;
            }

            let values: Vec<f64> = feasible_results.iter().map(|r| r.value as f64).collect();
            let times: Vec<f64> = feasible_results.iter().map(|r| r.time).collect();
            let gaps: Vec<f64> = feasible_results
                .iter()
                .filter_map(|r| r.gap_to_best)
                .collect();

            let best_value = feasible_results.iter().fold(0, |acc, r| acc.max(r.value));
            let worst_value = feasible_results
                .iter()
                .fold(u64::MAX, |acc, r| acc.min(r.value));

            let std_value = if values.len() > 1 {
                values.iter().std_dev()
            } else {
                0.0
            };

            let avg_gap = if !gaps.is_empty() {
                Some(gaps.iter().mean())
            } else {
                None
            };

            statistics.push(AlgorithmStatistics {
                algorithm: algo,
                num_runs: results.len(),
                num_feasible: feasible_results.len(),
                avg_value: values.iter().mean(),
                best_value,
                worst_value,
                std_value,
                avg_time: times.iter().mean(),
                total_time: times.iter().sum(),
                avg_gap,
            });
        }

        statistics.sort_by(|a, b| b.avg_value.total_cmp(&a.avg_value));

        statistics
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        let stats = self.compute_statistics();
        for stat in stats {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("      Knapsack Benchmark Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!(
            "Generated: {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        let stats = self.compute_statistics();

        report.push_str("Algorithm Performance Summary:\n");
        report.push_str("-".repeat(80).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<20} {:>10} {:>12} {:>12} {:>12} {:>10}\n",
            "Algorithm", "Feasible", "Avg Value", "Best Value", "Avg Gap%", "Avg Time"
        ));
        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        for stat in &stats {
            let gap_str = stat
                .avg_gap
                .map(|g| format!("{:.2}%", g))
                .unwrap_or_else(|| "-".to_string());

            report.push_str(&format!(
                "{:<20} {:>10} {:>12.2} {:>12} {:>12} {:>10.4}\n",
                stat.algorithm,
                format!("{}/{}", stat.num_feasible, stat.num_runs),
                stat.avg_value,
                stat.best_value,
                gap_str,
                stat.avg_time
            ));
        }

        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        report.push_str("\nBest Solutions per Instance:\n");

        let mut instance_best: HashMap<&str, &AlgorithmResult> = HashMap::new();

        for result in self.results.iter().filter(|r| r.feasible) {
            let entry = instance_best.entry(&result.instance).or_insert(result);
            if result.value > entry.value {
                *entry = result;
            }
        }

        let mut names: Vec<_> = instance_best.keys().copied().collect();
        names.sort_unstable();
        for name in names {
            let best = instance_best[name];
            report.push_str(&format!("  {}: {} ({})\n", name, best.value, best.algorithm));
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }

    /// Get best known values
    pub fn best_known(&self) -> &HashMap<String, u64> {
        &self.best_known
    }
}

/// Strip the per-seed suffix of an algorithm name
fn algorithm_family(name: &str) -> &str {
    name.split("-run").next().unwrap_or(name)
}

/// Helper function to load instances from a directory
///
/// Every regular file is tried; files that fail to parse are skipped with a
/// warning.
pub fn load_instances_from_dir<P: AsRef<Path>>(dir: P) -> Vec<KnapsackInstance> {
    let mut instances = Vec::new();

    match std::fs::read_dir(dir.as_ref()) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                match KnapsackInstance::from_file(&path) {
                    Ok(instance) => instances.push(instance),
                    Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
                }
            }
        }
        Err(e) => log::error!("Cannot read directory {}: {}", dir.as_ref().display(), e),
    }

    // Sort by size, then name for a stable order
    instances.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.name.cmp(&b.name)));

    instances
}
