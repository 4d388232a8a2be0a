use super::traits::ConfigSection;
use crate::engines::generation::codec::FIELD_COUNT;
use crate::error::TradeIntervalError;
use serde::{Deserialize, Serialize};

/// Genetic search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub chromosome_length: usize,
    /// Bits per encoded parameter field
    pub field_width: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub seed: Option<u64>,
    /// Evaluate each generation on the rayon pool
    pub parallel: bool,
    /// Log progress every N generations
    pub log_every: usize,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            chromosome_length: 10,
            field_width: 2,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            seed: None,
            parallel: true,
            log_every: 10,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), TradeIntervalError> {
        if self.population_size < 2 || self.population_size % 2 != 0 {
            return Err(TradeIntervalError::Configuration(format!(
                "Population size must be even and at least 2, got {}",
                self.population_size
            )));
        }
        if self.generations == 0 {
            return Err(TradeIntervalError::Configuration(
                "Generations must be at least 1".to_string(),
            ));
        }
        if self.field_width == 0 || self.field_width > 16 {
            return Err(TradeIntervalError::Configuration(format!(
                "Field width must be between 1 and 16 bits, got {}",
                self.field_width
            )));
        }
        if self.chromosome_length < FIELD_COUNT * self.field_width {
            return Err(TradeIntervalError::Configuration(format!(
                "Chromosome length {} cannot hold {} fields of {} bits",
                self.chromosome_length, FIELD_COUNT, self.field_width
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(TradeIntervalError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(TradeIntervalError::Configuration(
                "Crossover rate must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}
