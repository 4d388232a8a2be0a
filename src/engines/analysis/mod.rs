pub mod intervals;
pub mod rules;

pub use intervals::IntervalAnalyzer;
pub use rules::{generate_trading_rules, TradingRule};
