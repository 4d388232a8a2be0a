pub mod stats;
pub mod risk;

pub use risk::RiskMetrics;
pub use stats::{mean, std_dev};
