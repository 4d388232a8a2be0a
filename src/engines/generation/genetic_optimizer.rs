use crate::config::{ConfigSection, EvolutionConfig};
use crate::engines::generation::{
    fitness::FitnessFunction,
    genome::Chromosome,
    operators::{crossover, initialize_population, mutate, select_parents},
};
use crate::error::{Result, TradeIntervalError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome of one generation, reported to callbacks and kept in the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    /// Best finite fitness in this generation, negative infinity if none
    pub generation_best: f64,
    /// Running maximum across all generations so far
    pub best_so_far: f64,
    pub valid_candidates: usize,
    /// Evaluation failed and the population was carried forward
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerState {
    pub best_solution: Option<Chromosome>,
    pub best_fitness: f64,
    pub history: Vec<GenerationSummary>,
}

impl Default for OptimizerState {
    fn default() -> Self {
        Self {
            best_solution: None,
            best_fitness: f64::NEG_INFINITY,
            history: Vec::new(),
        }
    }
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, summary: &GenerationSummary);
    fn on_generation_skipped(&mut self, generation: usize, error: &TradeIntervalError);
}

/// Generational genetic algorithm over bit-string chromosomes.
///
/// Runs a fixed number of generations: evaluate, update the best-ever solution,
/// then breed `population_size / 2` pairs by roulette selection, single-point
/// crossover and single-bit mutation. All randomness comes from the optimizer's own
/// seeded `StdRng`, so a given seed and fitness function always give the same run,
/// whether or not evaluation is parallel.
pub struct GeneticOptimizer {
    config: EvolutionConfig,
    rng: StdRng,
    state: OptimizerState,
    population: Vec<Chromosome>,
}

impl GeneticOptimizer {
    pub fn new(config: EvolutionConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: EvolutionConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            state: OptimizerState::default(),
            population: Vec::new(),
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn state(&self) -> &OptimizerState {
        &self.state
    }

    pub fn best_solution(&self) -> Option<&Chromosome> {
        self.state.best_solution.as_ref()
    }

    pub fn best_fitness(&self) -> f64 {
        self.state.best_fitness
    }

    /// Population after the last completed generation
    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }

    pub fn into_state(self) -> OptimizerState {
        self.state
    }

    pub fn initialize_population(&mut self) -> Vec<Chromosome> {
        initialize_population(
            self.config.population_size,
            self.config.chromosome_length,
            &mut self.rng,
        )
    }

    /// Run the search from a fresh random population
    pub fn evolve<F, C>(&mut self, fitness: &F, callback: &mut C) -> &OptimizerState
    where
        F: FitnessFunction + ?Sized,
        C: ProgressCallback,
    {
        self.state = OptimizerState::default();
        let mut population = self.initialize_population();

        for generation in 0..self.config.generations {
            callback.on_generation_start(generation);

            match self.run_generation(generation, &population, fitness) {
                Ok((next_population, summary)) => {
                    callback.on_generation_complete(&summary);
                    self.state.history.push(summary);
                    population = next_population;
                }
                Err(e) => {
                    log::warn!("Evolution error in generation {}: {}", generation, e);
                    callback.on_generation_skipped(generation, &e);
                    self.state.history.push(GenerationSummary {
                        generation,
                        generation_best: f64::NEG_INFINITY,
                        best_so_far: self.state.best_fitness,
                        valid_candidates: 0,
                        skipped: true,
                    });
                }
            }
        }

        self.population = population;
        match &self.state.best_solution {
            Some(best) => log::info!(
                "Evolution finished: best fitness {:.4} ({})",
                self.state.best_fitness,
                best
            ),
            None => log::info!("Evolution finished without a finite-fitness solution"),
        }
        &self.state
    }

    fn run_generation<F>(
        &mut self,
        generation: usize,
        population: &[Chromosome],
        fitness: &F,
    ) -> Result<(Vec<Chromosome>, GenerationSummary)>
    where
        F: FitnessFunction + ?Sized,
    {
        let fitness_values = self.evaluate_population(population, fitness)?;
        let next_population = self.create_next_generation(population, &fitness_values)?;

        // Only commit bookkeeping once the generation went through.
        let (generation_best, valid_candidates) =
            self.update_best(population, &fitness_values);

        Ok((
            next_population,
            GenerationSummary {
                generation,
                generation_best,
                best_so_far: self.state.best_fitness,
                valid_candidates,
                skipped: false,
            },
        ))
    }

    /// Fitness of every chromosome, in population order
    pub fn evaluate_population<F>(&self, population: &[Chromosome], fitness: &F) -> Result<Vec<f64>>
    where
        F: FitnessFunction + ?Sized,
    {
        if self.config.parallel {
            population
                .par_iter()
                .map(|chromosome| fitness.fitness(chromosome))
                .collect()
        } else {
            population
                .iter()
                .map(|chromosome| fitness.fitness(chromosome))
                .collect()
        }
    }

    /// Strictly better fitness replaces the best-ever solution; ties keep the
    /// earlier one, within a generation the lowest index wins.
    fn update_best(&mut self, population: &[Chromosome], fitness_values: &[f64]) -> (f64, usize) {
        let mut generation_best: Option<(usize, f64)> = None;
        let mut valid_candidates = 0;

        for (idx, &value) in fitness_values.iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            valid_candidates += 1;
            if generation_best.map_or(true, |(_, best)| value > best) {
                generation_best = Some((idx, value));
            }
        }

        let Some((idx, value)) = generation_best else {
            return (f64::NEG_INFINITY, 0);
        };

        if value > self.state.best_fitness {
            self.state.best_fitness = value;
            self.state.best_solution = Some(population[idx].clone());
        }
        (value, valid_candidates)
    }

    fn create_next_generation(
        &mut self,
        population: &[Chromosome],
        fitness_values: &[f64],
    ) -> Result<Vec<Chromosome>> {
        if fitness_values.len() != population.len() {
            return Err(TradeIntervalError::Evaluation(format!(
                "Got {} fitness values for {} chromosomes",
                fitness_values.len(),
                population.len()
            )));
        }

        let mut next_generation = Vec::with_capacity(self.config.population_size);
        for _ in 0..self.config.population_size / 2 {
            let selection = select_parents(fitness_values, &mut self.rng).ok_or_else(|| {
                TradeIntervalError::Configuration(
                    "Parent selection needs at least two chromosomes".to_string(),
                )
            })?;

            let (child1, child2) = crossover(
                &population[selection.first],
                &population[selection.second],
                self.config.crossover_rate,
                &mut self.rng,
            );
            next_generation.push(mutate(&child1, self.config.mutation_rate, &mut self.rng));
            next_generation.push(mutate(&child2, self.config.mutation_rate, &mut self.rng));
        }

        Ok(next_generation)
    }
}
