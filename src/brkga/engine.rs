//! BRKGA evolutionary loop.

use super::config::BrkgaConfig;
use super::decoder::Decoder;
use super::evolution::evolve;
use super::population::Population;
use crate::error::ConfigError;
use crate::instance::KnapsackInstance;
use crate::solution::Solution;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No population yet
    Uninitialized,
    /// Initial population built and ranked
    Initialized,
    /// At least one generation evolved, more to come
    Evolving,
    /// All generations evolved
    Done,
}

/// Progress snapshot handed to observers after every ranked generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// 0 for the initial population
    pub generation: usize,
    pub best_fitness: u64,
    pub mean_fitness: f64,
}

/// Biased Random-Key Genetic Algorithm for the 0/1 knapsack problem.
///
/// The random source is injected (or seeded from the config), so a seeded
/// run is reproducible generation by generation.
pub struct Brkga<'a, R: Rng = ChaCha8Rng> {
    config: BrkgaConfig,
    instance: &'a KnapsackInstance,
    decoder: Decoder<'a>,
    population: Population,
    rng: R,
    state: RunState,
    generation: usize,
    fitness_history: Vec<u64>,
}

impl<'a> Brkga<'a, ChaCha8Rng> {
    /// Create a solver seeded from `config.seed`, or from OS entropy if unset.
    pub fn new(instance: &'a KnapsackInstance, config: BrkgaConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(instance, config, rng)
    }
}

impl<'a, R: Rng> Brkga<'a, R> {
    /// Create a solver drawing from the given random source.
    pub fn with_rng(instance: &'a KnapsackInstance, config: BrkgaConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Brkga {
            decoder: Decoder::new(instance),
            population: Population::from_individuals(Vec::new()),
            fitness_history: Vec::new(),
            config,
            instance,
            rng,
            state: RunState::Uninitialized,
            generation: 0,
        })
    }

    /// Build and rank the initial population.
    ///
    /// Calling it again discards the current run and starts over.
    pub fn initialize(&mut self) {
        self.population = Population::random(
            &self.instance.items,
            self.config.population_size,
            &mut self.rng,
        );
        self.population.evaluate(&self.decoder, self.config.parallel);

        self.generation = 0;
        self.fitness_history.clear();
        self.fitness_history.push(self.best_fitness());
        self.state = if self.config.max_generations == 0 {
            RunState::Done
        } else {
            RunState::Initialized
        };

        log::info!(
            "[BRKGA] Initialized population of {} over {} items (elite {}, mutants {}, offspring {}), best {}",
            self.population.len(),
            self.instance.len(),
            self.config.elite_count(),
            self.config.mutant_count(),
            self.config.crossover_count(),
            self.best_fitness()
        );
        self.log_top();
    }

    /// Evolve one generation and re-rank it.
    ///
    /// Initializes first when needed; does nothing once the run is done.
    pub fn step(&mut self) {
        match self.state {
            RunState::Uninitialized => self.initialize(),
            RunState::Done => return,
            RunState::Initialized | RunState::Evolving => {}
        }
        if self.state == RunState::Done {
            return;
        }

        let mut next = evolve(
            &self.population,
            &self.instance.items,
            &self.config,
            &mut self.rng,
        );
        next.evaluate(&self.decoder, self.config.parallel);
        self.population = next;

        self.generation += 1;
        self.fitness_history.push(self.best_fitness());
        self.state = if self.generation >= self.config.max_generations {
            RunState::Done
        } else {
            RunState::Evolving
        };

        log::debug!(
            "[BRKGA] Gen {}  Best {}  Mean {:.2}",
            self.generation,
            self.best_fitness(),
            self.population.mean_fitness()
        );
        self.log_top();
    }

    /// Run all generations and return the best solution.
    pub fn run(&mut self) -> Solution {
        self.run_with_observer(|_| {})
    }

    /// Run all generations, reporting every ranked generation to `observer`.
    ///
    /// `computation_time` of the result covers initialization and evolution
    /// only; loading the instance is the caller's to time.
    pub fn run_with_observer<F: FnMut(&GenerationReport)>(&mut self, mut observer: F) -> Solution {
        let start = Instant::now();

        self.initialize();
        observer(&self.report());

        while self.state != RunState::Done {
            self.step();
            observer(&self.report());
        }

        let mut solution = self.best_solution();
        solution.computation_time = start.elapsed().as_secs_f64();

        log::info!(
            "[BRKGA] Finished {} generations in {:.3}s, best value {}",
            self.generation,
            solution.computation_time,
            solution.total_value
        );

        solution
    }

    /// Decoded best individual of the current population
    pub fn best_solution(&self) -> Solution {
        let mut solution = match self.population.best() {
            Some(best) => {
                let decoded = self.decoder.decode(&best.chromosome);
                Solution::from_mask(self.instance, &decoded.selected, "BRKGA")
            }
            None => Solution {
                algorithm: "BRKGA".to_string(),
                ..Solution::new()
            },
        };
        solution.iterations = Some(self.generation);
        solution
    }

    /// Best fitness of the current population (0 before initialization)
    pub fn best_fitness(&self) -> u64 {
        self.population.best().map(|b| b.fitness).unwrap_or(0)
    }

    pub fn report(&self) -> GenerationReport {
        GenerationReport {
            generation: self.generation,
            best_fitness: self.best_fitness(),
            mean_fitness: self.population.mean_fitness(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Generations evolved so far
    pub fn current_generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn config(&self) -> &BrkgaConfig {
        &self.config
    }

    /// Best fitness after initialization and after every generation
    pub fn fitness_history(&self) -> &[u64] {
        &self.fitness_history
    }

    fn log_top(&self) {
        if self.config.report_top > 0 && log::log_enabled!(log::Level::Debug) {
            for (rank, fitness) in self
                .population
                .top_fitness(self.config.report_top)
                .iter()
                .enumerate()
            {
                log::debug!("[BRKGA]   #{:<3} fitness {}", rank + 1, fitness);
            }
        }
    }
}
