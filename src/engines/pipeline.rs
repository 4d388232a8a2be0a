use crate::config::{AppConfig, EvolutionConfig};
use crate::engines::analysis::{generate_trading_rules, IntervalAnalyzer, TradingRule};
use crate::engines::generation::{
    Chromosome, FitnessEvaluator, GenerationSummary, GeneticOptimizer, LoggingProgressCallback,
    ParameterCodec, ProgressCallback,
};
use crate::error::Result;
use crate::types::{AnalysisParameters, PriceBar, TradingInterval};
use serde::{Deserialize, Serialize};

/// Result of a full genetic search. No best solution is a valid outcome: it means
/// no candidate ever produced a buy signal with finite fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    pub best_parameters: Option<AnalysisParameters>,
    pub best_chromosome: Option<Chromosome>,
    pub best_fitness: f64,
    pub history: Vec<GenerationSummary>,
}

impl OptimizationOutcome {
    pub fn found_solution(&self) -> bool {
        self.best_parameters.is_some()
    }
}

/// One deterministic analysis pass with an already chosen parameter set
pub fn analyze(series: &[PriceBar], parameters: &AnalysisParameters) -> Vec<TradingInterval> {
    IntervalAnalyzer::analyze_profit_patterns(series, parameters)
}

/// Genetic search for the parameter set with the highest fitness on `series`.
///
/// Fails only on an invalid `config`.
pub fn optimize(series: &[PriceBar], config: &EvolutionConfig) -> Result<OptimizationOutcome> {
    let mut callback = LoggingProgressCallback::new(config.log_every);
    optimize_with_callback(series, config, &mut callback)
}

pub fn optimize_with_callback<C: ProgressCallback>(
    series: &[PriceBar],
    config: &EvolutionConfig,
    callback: &mut C,
) -> Result<OptimizationOutcome> {
    let codec = ParameterCodec::new(config.field_width)?;
    let mut optimizer = GeneticOptimizer::new(config.clone())?;
    let evaluator = FitnessEvaluator::new(series, codec.clone());

    log::info!(
        "Optimizing over {} bars: population {}, {} generations",
        series.len(),
        config.population_size,
        config.generations
    );
    optimizer.evolve(&evaluator, callback);
    let state = optimizer.into_state();

    let best_parameters = state
        .best_solution
        .as_ref()
        .map(|chromosome| codec.decode(chromosome))
        .transpose()?;

    Ok(OptimizationOutcome {
        best_parameters,
        best_chromosome: state.best_solution,
        best_fitness: state.best_fitness,
        history: state.history,
    })
}

/// Everything a presentation layer needs about one instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub parameters: AnalysisParameters,
    pub intervals: Vec<TradingInterval>,
    pub rules: Vec<TradingRule>,
    pub optimization: Option<OptimizationOutcome>,
}

/// Analysis session for one price series
pub struct StockAnalyzer {
    symbol: String,
    series: Vec<PriceBar>,
    config: AppConfig,
    parameters: AnalysisParameters,
    last_outcome: Option<OptimizationOutcome>,
}

impl StockAnalyzer {
    pub fn new(symbol: impl Into<String>, series: Vec<PriceBar>, config: AppConfig) -> Result<Self> {
        config.validate()?;
        let parameters = config.analysis.parameters;
        Ok(Self {
            symbol: symbol.into(),
            series,
            config,
            parameters,
            last_outcome: None,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn series(&self) -> &[PriceBar] {
        &self.series
    }

    pub fn parameters(&self) -> &AnalysisParameters {
        &self.parameters
    }

    pub fn set_parameters(&mut self, parameters: AnalysisParameters) -> Result<()> {
        parameters.validate()?;
        self.parameters = parameters;
        Ok(())
    }

    pub fn last_outcome(&self) -> Option<&OptimizationOutcome> {
        self.last_outcome.as_ref()
    }

    /// Run the search and adopt its best parameters, if it found any
    pub fn optimize_parameters(&mut self) -> Result<&OptimizationOutcome> {
        let outcome = optimize(&self.series, &self.config.evolution)?;
        match outcome.best_parameters {
            Some(best) => self.parameters = best,
            None => log::warn!(
                "{}: no improving solution found, keeping {:?}",
                self.symbol,
                self.parameters
            ),
        }
        Ok(&*self.last_outcome.insert(outcome))
    }

    pub fn analyze(&self) -> Vec<TradingInterval> {
        analyze(&self.series, &self.parameters)
    }

    pub fn trading_rules(&self) -> Vec<TradingRule> {
        generate_trading_rules(&self.analyze(), self.config.analysis.stop_loss_ratio)
    }

    pub fn report(&self) -> AnalysisReport {
        let intervals = self.analyze();
        let rules = generate_trading_rules(&intervals, self.config.analysis.stop_loss_ratio);
        AnalysisReport {
            symbol: self.symbol.clone(),
            parameters: self.parameters,
            intervals,
            rules,
            optimization: self.last_outcome.clone(),
        }
    }
}
