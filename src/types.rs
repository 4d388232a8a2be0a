use crate::error::{Result, TradeIntervalError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Legal domain of each tunable analysis parameter.
pub const NUM_INTERVALS_RANGE: RangeInclusive<usize> = 3..=6;
pub const HOLDING_PERIOD_RANGE: RangeInclusive<usize> = 5..=25;
pub const TARGET_PROFIT_RATIO_RANGE: RangeInclusive<f64> = 0.5..=1.3;
pub const CONFIDENCE_THRESHOLD_RANGE: RangeInclusive<f64> = 0.3..=0.7;

// Decoded floats such as 0.3 + 3 * 0.1 land a hair outside the nominal bound.
const RANGE_TOLERANCE: f64 = 1e-9;

/// One trading session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub index: usize,
    pub date: Option<NaiveDate>,
    pub open: Option<f64>,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    pub fn new(index: usize, high: f64, low: f64, close: f64) -> Self {
        Self {
            index,
            date: None,
            open: None,
            high,
            low,
            close,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_open(mut self, open: f64) -> Self {
        self.open = Some(open);
        self
    }
}

/// Half-open price band `[lower, upper)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub lower: f64,
    pub upper: f64,
}

impl PriceBand {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.lower <= price && price < self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Hyperparameters of one interval analysis pass.
///
/// Values are plain data: the analyzer and the fitness evaluator receive them as an
/// argument on every call and never keep a "current" copy around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisParameters {
    pub num_intervals: usize,
    pub holding_period: usize,
    pub target_profit_ratio: f64,
    pub confidence_threshold: f64,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            num_intervals: 5,
            holding_period: 10,
            target_profit_ratio: 0.8,
            confidence_threshold: 0.6,
        }
    }
}

impl AnalysisParameters {
    /// Build a parameter set, rejecting values outside their domain
    pub fn new(
        num_intervals: usize,
        holding_period: usize,
        target_profit_ratio: f64,
        confidence_threshold: f64,
    ) -> Result<Self> {
        let params = Self {
            num_intervals,
            holding_period,
            target_profit_ratio,
            confidence_threshold,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !NUM_INTERVALS_RANGE.contains(&self.num_intervals) {
            return Err(TradeIntervalError::InvalidParameters(format!(
                "num_intervals {} outside {:?}",
                self.num_intervals, NUM_INTERVALS_RANGE
            )));
        }
        if !HOLDING_PERIOD_RANGE.contains(&self.holding_period) {
            return Err(TradeIntervalError::InvalidParameters(format!(
                "holding_period {} outside {:?}",
                self.holding_period, HOLDING_PERIOD_RANGE
            )));
        }
        if !within(self.target_profit_ratio, &TARGET_PROFIT_RATIO_RANGE) {
            return Err(TradeIntervalError::InvalidParameters(format!(
                "target_profit_ratio {} outside {:?}",
                self.target_profit_ratio, TARGET_PROFIT_RATIO_RANGE
            )));
        }
        if !within(self.confidence_threshold, &CONFIDENCE_THRESHOLD_RANGE) {
            return Err(TradeIntervalError::InvalidParameters(format!(
                "confidence_threshold {} outside {:?}",
                self.confidence_threshold, CONFIDENCE_THRESHOLD_RANGE
            )));
        }
        Ok(())
    }

    /// Copy of `self` with every field forced into its legal domain.
    /// NaN floats fall back to the lower bound.
    pub fn clamped(&self) -> Self {
        Self {
            num_intervals: self
                .num_intervals
                .clamp(*NUM_INTERVALS_RANGE.start(), *NUM_INTERVALS_RANGE.end()),
            holding_period: self
                .holding_period
                .clamp(*HOLDING_PERIOD_RANGE.start(), *HOLDING_PERIOD_RANGE.end()),
            target_profit_ratio: clamp_f64(self.target_profit_ratio, &TARGET_PROFIT_RATIO_RANGE),
            confidence_threshold: clamp_f64(self.confidence_threshold, &CONFIDENCE_THRESHOLD_RANGE),
        }
    }
}

fn within(value: f64, range: &RangeInclusive<f64>) -> bool {
    value >= range.start() - RANGE_TOLERANCE && value <= range.end() + RANGE_TOLERANCE
}

fn clamp_f64(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

/// Empirical forward-profit statistics for one price band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingInterval {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub avg_profit: f64,
    pub profit_probability: f64,
    pub sample_size: usize,
    pub is_buy_signal: bool,
}

impl TradingInterval {
    pub fn band(&self) -> PriceBand {
        PriceBand::new(self.lower_bound, self.upper_bound)
    }

    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}
