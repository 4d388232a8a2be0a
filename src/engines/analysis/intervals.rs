use crate::types::{AnalysisParameters, PriceBand, PriceBar, TradingInterval};

/// Splits the observed price range into equal bands and measures, per band, how a
/// position bought at the close and held for `holding_period` bars would have done.
///
/// The analyzer is stateless: every call takes the series and the parameters it
/// should use, so concurrent fitness evaluations can share it freely.
pub struct IntervalAnalyzer;

impl IntervalAnalyzer {
    /// `(min(low), max(high))` over the series, `None` when empty or non-finite
    pub fn price_range(series: &[PriceBar]) -> Option<(f64, f64)> {
        if series.is_empty() {
            return None;
        }
        let min_low = series.iter().map(|bar| bar.low).fold(f64::INFINITY, f64::min);
        let max_high = series
            .iter()
            .map(|bar| bar.high)
            .fold(f64::NEG_INFINITY, f64::max);

        if min_low.is_finite() && max_high.is_finite() && min_low <= max_high {
            Some((min_low, max_high))
        } else {
            None
        }
    }

    /// Partition `[min(low), max(high)]` into `num_intervals` contiguous bands of
    /// equal width, ascending. The last band ends exactly at `max(high)`.
    ///
    /// A flat series yields zero-width bands, which can hold no price.
    pub fn compute_intervals(series: &[PriceBar], num_intervals: usize) -> Vec<PriceBand> {
        let Some((min_price, max_price)) = Self::price_range(series) else {
            return Vec::new();
        };
        if num_intervals == 0 {
            return Vec::new();
        }

        let interval_length = (max_price - min_price) / num_intervals as f64;
        (0..num_intervals)
            .map(|i| {
                let lower = min_price + i as f64 * interval_length;
                let upper = if i + 1 == num_intervals {
                    max_price
                } else {
                    min_price + (i + 1) as f64 * interval_length
                };
                PriceBand::new(lower, upper)
            })
            .collect()
    }

    /// `(close[i], close[i + holding_period])` for every `i` that has a sell bar
    pub fn buy_sell_pairs(
        series: &[PriceBar],
        holding_period: usize,
    ) -> impl Iterator<Item = (f64, f64)> + '_ {
        series
            .iter()
            .zip(series.iter().skip(holding_period))
            .map(|(buy, sell)| (buy.close, sell.close))
    }

    /// Index of the first band containing `price`.
    /// A price equal to the top of the range belongs to no band.
    pub fn locate(bands: &[PriceBand], price: f64) -> Option<usize> {
        bands.iter().position(|band| band.contains(price))
    }

    /// Per-band profit statistics. Bands that received no buy price are left out.
    pub fn analyze_profit_patterns(
        series: &[PriceBar],
        params: &AnalysisParameters,
    ) -> Vec<TradingInterval> {
        if series.len() <= params.holding_period {
            log::debug!(
                "Series of {} bars too short for a {}-bar holding period",
                series.len(),
                params.holding_period
            );
            return Vec::new();
        }

        let bands = Self::compute_intervals(series, params.num_intervals);
        let mut interval_profits: Vec<Vec<f64>> = vec![Vec::new(); bands.len()];

        let mut dropped = 0usize;
        for (buy_price, sell_price) in Self::buy_sell_pairs(series, params.holding_period) {
            match Self::locate(&bands, buy_price) {
                Some(idx) => interval_profits[idx].push(sell_price - buy_price),
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            log::trace!("{} buy prices fell outside every band", dropped);
        }

        bands
            .iter()
            .zip(interval_profits)
            .filter(|(_, profits)| !profits.is_empty())
            .map(|(band, profits)| Self::summarize(band, &profits, params))
            .collect()
    }

    fn summarize(
        band: &PriceBand,
        profits: &[f64],
        params: &AnalysisParameters,
    ) -> TradingInterval {
        let sample_size = profits.len();
        let avg_profit = profits.iter().sum::<f64>() / sample_size as f64;
        let target_profit = params.target_profit_ratio * band.width();
        let hits = profits.iter().filter(|&&p| p >= target_profit).count();
        let profit_probability = hits as f64 / sample_size as f64;

        TradingInterval {
            lower_bound: band.lower,
            upper_bound: band.upper,
            avg_profit,
            profit_probability,
            sample_size,
            is_buy_signal: profit_probability >= params.confidence_threshold,
        }
    }
}
