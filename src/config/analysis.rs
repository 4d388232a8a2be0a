use super::traits::ConfigSection;
use crate::error::TradeIntervalError;
use crate::types::AnalysisParameters;
use serde::{Deserialize, Serialize};

/// Parameters used when the search is not run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub parameters: AnalysisParameters,
    /// Stop loss distance below a buy band, as a fraction of its lower bound
    pub stop_loss_ratio: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parameters: AnalysisParameters::default(),
            stop_loss_ratio: 0.2,
        }
    }
}

impl ConfigSection for AnalysisConfig {
    fn section_name() -> &'static str {
        "analysis"
    }

    fn validate(&self) -> Result<(), TradeIntervalError> {
        self.parameters
            .validate()
            .map_err(|e| TradeIntervalError::Configuration(e.to_string()))?;
        if !(0.0..1.0).contains(&self.stop_loss_ratio) {
            return Err(TradeIntervalError::Configuration(
                "Stop loss ratio must be in [0, 1)".to_string(),
            ));
        }
        Ok(())
    }
}
