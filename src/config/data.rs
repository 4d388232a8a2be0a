use super::traits::ConfigSection;
use crate::error::TradeIntervalError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Minimum number of bars a CSV file must contain
    pub min_rows: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { min_rows: 30 }
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), TradeIntervalError> {
        if self.min_rows < 2 {
            return Err(TradeIntervalError::Configuration(
                "Minimum rows must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}
