pub mod traits;
pub mod evolution;
pub mod analysis;
pub mod data;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::EvolutionConfig;
pub use analysis::AnalysisConfig;
pub use data::DataConfig;
pub use traits::ConfigSection;
