pub mod analysis;
pub mod generation;
pub mod metrics;
pub mod pipeline;

pub use analysis::{IntervalAnalyzer, TradingRule};
pub use generation::{FitnessEvaluator, GeneticOptimizer, ParameterCodec};
pub use pipeline::{analyze, optimize, optimize_with_callback, AnalysisReport, OptimizationOutcome, StockAnalyzer};
