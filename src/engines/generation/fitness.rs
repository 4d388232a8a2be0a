use crate::engines::analysis::IntervalAnalyzer;
use crate::engines::generation::{codec::ParameterCodec, genome::Chromosome};
use crate::engines::metrics::{mean, RiskMetrics};
use crate::error::{Result, TradeIntervalError};
use crate::types::{AnalysisParameters, PriceBar, TradingInterval};

/// Scores one chromosome. Higher is better, negative infinity rejects the candidate.
///
/// Returning `Err` means the whole generation could not be scored; the optimizer
/// logs it and carries the population forward unchanged.
pub trait FitnessFunction: Sync {
    fn fitness(&self, chromosome: &Chromosome) -> Result<f64>;
}

impl<F> FitnessFunction for F
where
    F: Fn(&Chromosome) -> Result<f64> + Sync,
{
    fn fitness(&self, chromosome: &Chromosome) -> Result<f64> {
        self(chromosome)
    }
}

/// Decode -> analyze -> reduce to a single risk-adjusted score.
///
/// Per-candidate failures never escape: they become negative infinity, so one bad
/// chromosome cannot abort a search.
pub struct FitnessEvaluator<'a> {
    series: &'a [PriceBar],
    codec: ParameterCodec,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(series: &'a [PriceBar], codec: ParameterCodec) -> Self {
        Self { series, codec }
    }

    pub fn codec(&self) -> &ParameterCodec {
        &self.codec
    }

    pub fn evaluate(&self, chromosome: &Chromosome) -> f64 {
        match self.try_evaluate(chromosome) {
            Ok(score) if score.is_finite() => score,
            Ok(_) => f64::NEG_INFINITY,
            Err(e) => {
                log::debug!("Fitness evaluation failed for {}: {}", chromosome, e);
                f64::NEG_INFINITY
            }
        }
    }

    fn try_evaluate(&self, chromosome: &Chromosome) -> Result<f64> {
        if self.series.is_empty() {
            return Err(TradeIntervalError::Evaluation(
                "Empty price series".to_string(),
            ));
        }
        // Re-clamp: alternative codecs are not trusted to stay in bounds.
        let params = self.codec.decode(chromosome)?.clamped();
        Ok(Self::score_parameters(self.series, &params))
    }

    /// Score an explicit parameter set against `series`
    pub fn score_parameters(series: &[PriceBar], params: &AnalysisParameters) -> f64 {
        let intervals = IntervalAnalyzer::analyze_profit_patterns(series, params);
        Self::score_intervals(&intervals)
    }

    /// `total_profit * avg_probability * ln(1 + avg_sample_size) * risk_factor`
    /// over the buy-signal intervals; negative infinity when there are none or the
    /// result is not finite.
    pub fn score_intervals(intervals: &[TradingInterval]) -> f64 {
        let buy_signals: Vec<&TradingInterval> =
            intervals.iter().filter(|i| i.is_buy_signal).collect();
        if buy_signals.is_empty() {
            return f64::NEG_INFINITY;
        }

        let profits: Vec<f64> = buy_signals.iter().map(|i| i.avg_profit).collect();
        let probabilities: Vec<f64> = buy_signals.iter().map(|i| i.profit_probability).collect();
        let sample_sizes: Vec<f64> = buy_signals.iter().map(|i| i.sample_size as f64).collect();

        let total_profit: f64 = profits.iter().sum();
        let avg_probability = mean(&probabilities).unwrap_or(0.0);
        let avg_sample_size = mean(&sample_sizes).unwrap_or(0.0);
        let risk_factor = RiskMetrics::risk_factor(&profits, total_profit);

        let score = total_profit * avg_probability * avg_sample_size.ln_1p() * risk_factor;
        if score.is_finite() {
            score
        } else {
            f64::NEG_INFINITY
        }
    }
}

impl FitnessFunction for FitnessEvaluator<'_> {
    fn fitness(&self, chromosome: &Chromosome) -> Result<f64> {
        Ok(self.evaluate(chromosome))
    }
}
