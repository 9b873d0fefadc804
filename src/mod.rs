//! Differential evolution engine for black-box minimization, applied here
//! to inverse kinematics of chained-link manipulators.
//!
//! The optimizer drives a caller-supplied fitness function toward a target
//! value with the classic DE/rand/1/bin scheme:
//! - uniform random initialization within per-dimension bounds
//! - mutation `a + F * (c - b)` from three distinct population members
//! - binomial crossover with one forced index
//! - greedy one-to-one selection, ties going to the trial
//! - termination on generation budget, target fitness, or stall
//!
//! The engine is single-threaded and synchronous. The caller owns the loop
//! via [`Evolver::should_continue`] / [`Evolver::evolve_one_generation`]
//! and can stop between generations at will:
//!
//! ```no_run
//! use ik_de::{Evolver, EvolverConfigBuilder};
//! use ndarray::Array1;
//!
//! let fitness = |x: &Array1<f64>| x.iter().map(|v| v * v).sum::<f64>();
//! let config = EvolverConfigBuilder::new().seed(42).max_generations(200).build();
//! let mut evolver = Evolver::new(fitness, &[(-5.0, 5.0)], 3, config).unwrap();
//! evolver.initialize();
//! while evolver.should_continue() {
//!     evolver.evolve_one_generation().unwrap();
//! }
//! println!("best fitness: {}", evolver.best_fitness());
//! ```

use std::fmt;

use log::{debug, info};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod error;
pub mod kinematics;
pub mod recorder;
pub mod run_recorded;
pub mod search_space;
pub mod vector3;

mod crossover_binomial;
mod distinct_indices;
mod init_random;
mod mutant_rand1;

pub use error::{EvolveError, Result};
pub use kinematics::{distance_fitness, DhParameters, Link, Manipulator};
pub use recorder::{EvolutionRecorder, GenerationRecord};
pub use run_recorded::{run_recorded_evolution, EvolveReport};
pub use search_space::SearchSpace;
pub use vector3::Vector3;

/// Criterion that stopped the evolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The configured generation budget is exhausted.
    MaxGenerations,
    /// The best fitness reached the configured target.
    TargetFitness,
    /// Best fitness stopped improving for the configured number of
    /// consecutive generations.
    Stalled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::MaxGenerations => write!(f, "max generations reached"),
            Termination::TargetFitness => write!(f, "target fitness reached"),
            Termination::Stalled => write!(f, "evolution stalled"),
        }
    }
}

/// Algorithm parameters for [`Evolver`].
///
/// The defaults suit the bundled inverse-kinematics problem: population 15,
/// crossover rate 0.5, weighting factor 0.5, at most 2000 generations,
/// target fitness 0, stall after 50 generations below 10% relative
/// improvement.
#[derive(Debug, Clone)]
pub struct EvolverConfig {
    /// Number of agents; must be at least 4.
    pub population_size: usize,
    /// Probability in `[0, 1]` that a non-forced trial dimension takes the
    /// mutant value.
    pub crossover_rate: f64,
    /// Differential weight `F`, typically in `(0, 2]`.
    pub weighting_factor: f64,
    /// Generation budget; `0` disables the criterion.
    pub max_generations: usize,
    /// Fitness at or below which the run stops; negative disables.
    pub target_fitness: f64,
    /// Consecutive stalled generations before stopping; `0` disables.
    pub stall_period: usize,
    /// Relative best-fitness improvement at or below which a generation
    /// counts as stalled; in `[0, 1]`.
    pub stall_factor: f64,
    /// Seed for the random source; `None` seeds from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for EvolverConfig {
    fn default() -> Self {
        Self {
            population_size: 15,
            crossover_rate: 0.5,
            weighting_factor: 0.5,
            max_generations: 2000,
            target_fitness: 0.0,
            stall_period: 50,
            stall_factor: 0.1,
            seed: None,
        }
    }
}

/// Fluent builder for [`EvolverConfig`].
pub struct EvolverConfigBuilder {
    cfg: EvolverConfig,
}

impl EvolverConfigBuilder {
    pub fn new() -> Self {
        Self { cfg: EvolverConfig::default() }
    }
    pub fn population_size(mut self, v: usize) -> Self {
        self.cfg.population_size = v;
        self
    }
    pub fn crossover_rate(mut self, v: f64) -> Self {
        self.cfg.crossover_rate = v;
        self
    }
    pub fn weighting_factor(mut self, v: f64) -> Self {
        self.cfg.weighting_factor = v;
        self
    }
    pub fn max_generations(mut self, v: usize) -> Self {
        self.cfg.max_generations = v;
        self
    }
    pub fn target_fitness(mut self, v: f64) -> Self {
        self.cfg.target_fitness = v;
        self
    }
    pub fn stall_period(mut self, v: usize) -> Self {
        self.cfg.stall_period = v;
        self
    }
    pub fn stall_factor(mut self, v: f64) -> Self {
        self.cfg.stall_factor = v;
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    pub fn build(self) -> EvolverConfig {
        self.cfg
    }
}

impl Default for EvolverConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Differential evolution engine.
///
/// Owns the population, the fitness function, the random source, and the
/// termination state. Populations are replaced wholesale at the end of
/// every generation, so mutation and crossover within a generation always
/// read the previous generation's values.
pub struct Evolver<F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    fitness: F,
    space: SearchSpace,
    config: EvolverConfig,
    rng: StdRng,
    population: Option<Array2<f64>>,
    generation: usize,
    best_fitness: f64,
    best_agent: Option<Array1<f64>>,
    stall_count: usize,
}

impl<F> Evolver<F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    /// Create an engine for `dim`-dimensional agents.
    ///
    /// `bounds` holds one `(lower, upper)` pair per dimension, or a single
    /// pair that is broadcast to every dimension. All configuration is
    /// validated here; after construction the only fallible operation is
    /// calling [`evolve_one_generation`](Self::evolve_one_generation)
    /// before [`initialize`](Self::initialize).
    pub fn new(
        fitness: F,
        bounds: &[(f64, f64)],
        dim: usize,
        config: EvolverConfig,
    ) -> Result<Self> {
        let space = SearchSpace::broadcast(bounds, dim)?;
        if config.population_size < 4 {
            return Err(EvolveError::PopulationTooSmall { size: config.population_size });
        }
        if !(0.0..=1.0).contains(&config.crossover_rate) {
            return Err(EvolveError::InvalidCrossoverRate { rate: config.crossover_rate });
        }
        if !(0.0..=1.0).contains(&config.stall_factor) {
            return Err(EvolveError::InvalidStallFactor { factor: config.stall_factor });
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        };
        Ok(Self {
            fitness,
            space,
            config,
            rng,
            population: None,
            generation: 0,
            best_fitness: f64::INFINITY,
            best_agent: None,
            stall_count: 0,
        })
    }

    /// (Re)seed the population with uniform random agents.
    ///
    /// Counters and the best-found agent are left untouched; they are
    /// mutated only by [`evolve_one_generation`](Self::evolve_one_generation).
    pub fn initialize(&mut self) {
        self.population =
            Some(init_random::init_random(self.config.population_size, &self.space, &mut self.rng));
    }

    /// Generations completed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best fitness found so far; `+inf` before the first generation.
    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    /// Best agent found so far; `None` before the first generation.
    pub fn best_agent(&self) -> Option<&Array1<f64>> {
        self.best_agent.as_ref()
    }

    /// Current population; `None` before [`initialize`](Self::initialize).
    pub fn population(&self) -> Option<&Array2<f64>> {
        self.population.as_ref()
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn config(&self) -> &EvolverConfig {
        &self.config
    }

    /// Which termination criterion currently holds, if any.
    ///
    /// Criteria are checked in priority order: generation budget, target
    /// fitness, stall.
    pub fn termination(&self) -> Option<Termination> {
        let c = &self.config;
        if c.max_generations > 0 && self.generation == c.max_generations {
            return Some(Termination::MaxGenerations);
        }
        if c.target_fitness >= 0.0 && self.best_fitness <= c.target_fitness {
            return Some(Termination::TargetFitness);
        }
        if c.stall_period > 0 && self.stall_count >= c.stall_period {
            return Some(Termination::Stalled);
        }
        None
    }

    /// `true` while no termination criterion holds; logs the reason once
    /// one does.
    pub fn should_continue(&self) -> bool {
        match self.termination() {
            Some(reason) => {
                info!("{reason}");
                false
            }
            None => true,
        }
    }

    /// Run one generation: build a full replacement population by mutation,
    /// crossover and greedy selection against the frozen current
    /// population, then update the stall counter.
    ///
    /// Returns [`EvolveError::NotInitialized`] when called before
    /// [`initialize`](Self::initialize).
    pub fn evolve_one_generation(&mut self) -> Result<()> {
        let pop = self.population.take().ok_or(EvolveError::NotInitialized)?;
        let npop = pop.nrows();
        let dim = pop.ncols();
        let last_best = self.best_fitness;
        let mut next = Array2::<f64>::zeros((npop, dim));

        for i in 0..npop {
            let reference = pop.row(i).to_owned();
            let mutant = mutant_rand1::mutant_rand1(
                i,
                &pop,
                self.config.weighting_factor,
                &self.space,
                &mut self.rng,
            );
            let trial = crossover_binomial::binomial_crossover(
                &reference,
                &mutant,
                self.config.crossover_rate,
                &mut self.rng,
            );

            let reference_fitness = (self.fitness)(&reference);
            let trial_fitness = (self.fitness)(&trial);

            // greedy selection; exact ties go to the trial
            let (winner, winner_fitness) = if trial_fitness <= reference_fitness {
                (trial, trial_fitness)
            } else {
                (reference, reference_fitness)
            };
            // ties go to the newer candidate here as well
            if winner_fitness <= self.best_fitness {
                self.best_fitness = winner_fitness;
                self.best_agent = Some(winner.clone());
            }
            next.row_mut(i).assign(&winner);
        }
        self.population = Some(next);

        // Relative improvement of the best fitness. An infinite previous
        // best (nothing evaluated yet) never counts as a stall.
        if last_best.is_finite() {
            let improvement = (last_best - self.best_fitness) / last_best;
            if improvement <= self.config.stall_factor {
                self.stall_count += 1;
            } else {
                self.stall_count = 0;
            }
        } else {
            self.stall_count = 0;
        }
        self.generation += 1;
        debug!(
            "generation {}: best fitness {:.6e}, stall count {}",
            self.generation, self.best_fitness, self.stall_count
        );
        Ok(())
    }
}
