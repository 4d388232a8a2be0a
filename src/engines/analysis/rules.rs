use crate::types::{PriceBand, TradingInterval};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Human-facing advice derived from one analyzed interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TradingRule {
    Buy {
        band: PriceBand,
        stop_loss: f64,
        probability: f64,
        avg_profit: f64,
        sample_size: usize,
    },
    Watch {
        band: PriceBand,
        avg_profit: f64,
        sample_size: usize,
    },
}

impl TradingRule {
    pub fn band(&self) -> PriceBand {
        match self {
            Self::Buy { band, .. } | Self::Watch { band, .. } => *band,
        }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, Self::Buy { .. })
    }
}

impl fmt::Display for TradingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy {
                band,
                stop_loss,
                probability,
                avg_profit,
                sample_size,
            } => {
                writeln!(f, "BUY when price is within {:.2}-{:.2}", band.lower, band.upper)?;
                writeln!(f, "  - stop loss: sell if price falls below {:.2}", stop_loss)?;
                writeln!(f, "  - probability of reaching target: {:.1}%", probability * 100.0)?;
                writeln!(f, "  - average profit: {:.2}", avg_profit)?;
                write!(f, "  - based on {} historical samples", sample_size)
            }
            Self::Watch {
                band,
                avg_profit,
                sample_size,
            } => {
                writeln!(f, "WATCH when price is within {:.2}-{:.2}", band.lower, band.upper)?;
                writeln!(f, "  - average profit: {:.2}", avg_profit)?;
                write!(f, "  - based on {} historical samples", sample_size)
            }
        }
    }
}

/// One rule per interval, in interval order.
/// Buy rules place the stop loss `stop_loss_ratio * lower` below the band.
pub fn generate_trading_rules(
    intervals: &[TradingInterval],
    stop_loss_ratio: f64,
) -> Vec<TradingRule> {
    intervals
        .iter()
        .map(|interval| {
            if interval.is_buy_signal {
                TradingRule::Buy {
                    band: interval.band(),
                    stop_loss: interval.lower_bound - stop_loss_ratio * interval.lower_bound,
                    probability: interval.profit_probability,
                    avg_profit: interval.avg_profit,
                    sample_size: interval.sample_size,
                }
            } else {
                TradingRule::Watch {
                    band: interval.band(),
                    avg_profit: interval.avg_profit,
                    sample_size: interval.sample_size,
                }
            }
        })
        .collect()
}
