//! BRKGA Knapsack Solver - Command Line Interface
//!
//! Solves 0/1 knapsack instances with a Biased Random-Key Genetic Algorithm.

use brkga_knapsack::benchmark::{load_instances_from_dir, Benchmark, BenchmarkConfig};
use brkga_knapsack::brkga::{Brkga, BrkgaConfig};
use brkga_knapsack::exact::{DynamicProgrammingSolver, DEFAULT_MAX_CELLS};
use brkga_knapsack::heuristics::greedy::*;
use brkga_knapsack::instance::KnapsackInstance;
use brkga_knapsack::solution::Solution;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "brkga-knapsack")]
#[command(version = "1.0")]
#[command(about = "A Biased Random-Key Genetic Algorithm for the 0/1 knapsack problem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// BRKGA parameters shared by `solve` and `benchmark`
#[derive(Args, Clone)]
struct BrkgaArgs {
    /// Population size (P)
    #[arg(short, long, default_value = "100")]
    population: usize,

    /// Elite fraction (pe)
    #[arg(long, default_value = "0.3")]
    elite: f64,

    /// Mutant fraction (pm)
    #[arg(long, default_value = "0.2")]
    mutants: f64,

    /// Probability of inheriting the elite parent's key (rhoe)
    #[arg(long, default_value = "0.7")]
    rhoe: f64,

    /// Number of generations (G)
    #[arg(short, long, default_value = "200")]
    generations: usize,

    /// Per-gene mutation probability of crossover offspring
    #[arg(long, default_value = "0.05")]
    gene_mutation: f64,
}

impl BrkgaArgs {
    fn to_config(&self) -> BrkgaConfig {
        BrkgaConfig::default()
            .with_population_size(self.population)
            .with_elite_fraction(self.elite)
            .with_mutant_fraction(self.mutants)
            .with_elite_inheritance_prob(self.rhoe)
            .with_max_generations(self.generations)
            .with_gene_mutation_prob(self.gene_mutation)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance with the BRKGA
    Solve {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        #[command(flatten)]
        brkga: BrkgaArgs,

        /// Random seed (OS entropy when omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Decode individuals in parallel
        #[arg(long)]
        parallel: bool,

        /// Output solution to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,
    },

    /// Run benchmarks on a directory of instances
    Benchmark {
        /// Directory containing instance files
        #[arg(short, long)]
        dir: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Number of seeded BRKGA runs per instance
        #[arg(short, long, default_value = "5")]
        runs: usize,

        #[command(flatten)]
        brkga: BrkgaArgs,

        /// Skip the exact solver
        #[arg(long)]
        no_exact: bool,

        /// Cell limit (N * (C + 1)) of the exact solver
        #[arg(long, default_value_t = DEFAULT_MAX_CELLS)]
        exact_max_cells: u128,

        /// Maximum number of items
        #[arg(long)]
        max_size: Option<usize>,
    },
}

/// JSON document written by `solve --output`
#[derive(Serialize)]
struct RunReport<'a> {
    instance: &'a str,
    capacity: u64,
    num_items: usize,
    config: &'a BrkgaConfig,
    solution: &'a Solution,
    fitness_history: &'a [u64],
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { instance, brkga, seed, parallel, output, verbose } => {
            let mut config = brkga.to_config().with_parallel(parallel);
            config.seed = seed;
            solve_instance(&instance, config, output, verbose);
        }

        Commands::Analyze { instance } => {
            analyze_instance(&instance);
        }

        Commands::Benchmark { dir, output, runs, brkga, no_exact, exact_max_cells, max_size } => {
            let config = BenchmarkConfig {
                num_runs: runs,
                brkga: brkga.to_config(),
                run_exact: !no_exact,
                exact_max_cells,
                ..Default::default()
            };
            run_benchmark(&dir, &output, config, max_size);
        }
    }
}

fn load_or_exit(path: &Path) -> KnapsackInstance {
    match KnapsackInstance::from_file(path) {
        Ok(inst) => inst,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_instance(path: &Path, config: BrkgaConfig, output: Option<PathBuf>, verbose: bool) {
    // wall clock of the whole run, loading included
    let start = Instant::now();

    println!("Loading instance from {:?}...", path);
    let instance = load_or_exit(path);

    if verbose {
        println!("{}", instance.statistics());
        println!(
            "Parameters: P={} pe={} pm={} rhoe={} G={} mutation={}",
            config.population_size,
            config.elite_fraction,
            config.mutant_fraction,
            config.elite_inheritance_prob,
            config.max_generations,
            config.gene_mutation_prob
        );
    }

    let mut brkga = match Brkga::new(&instance, config) {
        Ok(brkga) => brkga,
        Err(e) => {
            eprintln!("Error in configuration: {}", e);
            std::process::exit(1);
        }
    };

    let progress = ProgressBar::new(brkga.config().max_generations as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut solution = brkga.run_with_observer(|report| {
        progress.set_position(report.generation as u64);
        progress.set_message(format!("best {}", report.best_fitness));
    });
    progress.finish_and_clear();
    solution.computation_time = start.elapsed().as_secs_f64();

    println!("\n========== Results ==========");
    println!("{}", solution);
    println!("Capacity used: {}/{} ({:.2}%)",
        solution.total_weight,
        instance.capacity,
        solution.capacity_usage(&instance) * 100.0);

    if verbose {
        let greedy = GreedyHeuristic::density().construct(&instance);
        println!("Greedy density baseline: {}", greedy.total_value);
    }

    println!("{}", summary_line(path, &solution));

    if let Some(output_path) = output {
        let report = RunReport {
            instance: &instance.name,
            capacity: instance.capacity,
            num_items: instance.len(),
            config: brkga.config(),
            solution: &solution,
            fitness_history: brkga.fitness_history(),
        };

        let written = serde_json::to_string_pretty(&report)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&output_path, json).map_err(|e| e.to_string()));

        match written {
            Ok(()) => println!("Solution saved to {:?}", output_path),
            Err(e) => {
                eprintln!("Error saving solution: {}", e);
                std::process::exit(1);
            }
        }
    }
}

/// One-line run summary: `<file> <best value> <seconds>`
fn summary_line(path: &Path, solution: &Solution) -> String {
    format!("{} {} {:.3}", path.display(), solution.total_value, solution.computation_time)
}

fn analyze_instance(path: &Path) {
    let instance = load_or_exit(path);

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    let multi = MultiStartConstruction::with_all_heuristics();
    let greedy = multi.construct(&instance);

    println!("Quick Solution Estimates:");
    println!("  {}: {} (weight {})", greedy.algorithm, greedy.total_value, greedy.total_weight);

    let exact = DynamicProgrammingSolver::new();
    match exact.solve(&instance) {
        Ok(optimum) => {
            println!("  Optimum (DP): {} in {:.3}s", optimum.total_value, optimum.computation_time);
            println!("  Greedy gap: {:.2}%", greedy.gap_to(optimum.total_value));
        }
        Err(e) => println!("  Optimum: skipped ({})", e),
    }
}

fn run_benchmark(dir: &Path, output: &Path, config: BenchmarkConfig, max_size: Option<usize>) {
    println!("Loading instances from {:?}...", dir);

    let mut instances = load_instances_from_dir(dir);

    if let Some(max) = max_size {
        instances.retain(|i| i.len() <= max);
    }

    println!("Found {} instances", instances.len());

    if instances.is_empty() {
        eprintln!("No instances found!");
        return;
    }

    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    }

    let mut benchmark = Benchmark::new(config);

    for (i, instance) in instances.iter().enumerate() {
        println!("\n[{}/{}] Processing {} (n={})...",
            i + 1, instances.len(), instance.name, instance.len());

        benchmark.run_full_benchmark(instance);
    }

    let results_path = output.join("results.csv");
    if let Err(e) = benchmark.export_to_csv(&results_path) {
        eprintln!("Error exporting results: {}", e);
        std::process::exit(1);
    }
    println!("\nResults exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    if let Err(e) = benchmark.export_statistics_csv(&stats_path) {
        eprintln!("Error exporting statistics: {}", e);
        std::process::exit(1);
    }
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    if let Err(e) = std::fs::write(&report_path, &report) {
        eprintln!("Error saving report: {}", e);
        std::process::exit(1);
    }
    println!("Report saved to {:?}", report_path);
}
