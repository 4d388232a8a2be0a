use super::stats::std_dev;

/// Guards the dispersion ratio when the summed profit is close to zero
pub const RISK_EPSILON: f64 = 1e-6;
/// Lowest multiplier a candidate's score can be scaled down to
pub const RISK_FLOOR: f64 = 0.1;

pub struct RiskMetrics;

impl RiskMetrics {
    /// `1 - stdev(profits) / (total_profit + eps)`, floored at [`RISK_FLOOR`].
    ///
    /// Buy bands whose average profits agree score close to 1; widely scattered
    /// profits push the factor towards the floor.
    pub fn risk_factor(avg_profits: &[f64], total_profit: f64) -> f64 {
        let dispersion = std_dev(avg_profits) / (total_profit + RISK_EPSILON);
        (1.0 - dispersion).max(RISK_FLOOR)
    }
}
