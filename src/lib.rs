//! Genetic-algorithm optimizer for price-interval trading signals.
//!
//! [`analyze`] partitions a price series into equal-width bands and measures how a
//! buy at the close, held for a fixed number of bars, performed in each band.
//! [`optimize`] searches the binary-encoded parameter space of that analysis with a
//! genetic algorithm and returns the best parameters found.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod types;

pub use engines::{analyze, optimize, AnalysisReport, OptimizationOutcome, StockAnalyzer};
pub use error::{Result, TradeIntervalError};
pub use types::{AnalysisParameters, PriceBand, PriceBar, TradingInterval};
