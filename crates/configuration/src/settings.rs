use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSettings,
    pub analytics: AnalyticsParams,
}

/// Network settings for the HTTP API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Tuning constants for the analytics engine.
///
/// None of these encode validated predictive power; they are documented
/// heuristics carried over from ad hoc business rules, so every one of them is
/// configurable rather than hardcoded in the engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsParams {
    /// Success rate assumed when a portfolio has no resolved (successful or
    /// failed) projects to compute a historical rate from.
    pub neutral_success_rate: Decimal,
    /// Converts the success-rate deviation from the neutral baseline into
    /// percentage points of projected return. With the default of 100, a
    /// portfolio resolving at a 60% success rate contributes +10 points
    /// before horizon weighting.
    pub success_spread: Decimal,
    /// Weight applied to the mean live-project funding velocity (%/day) when
    /// folding it into the ROI adjustment factor.
    pub velocity_weight: Decimal,
    /// Concentration index above which a diversification recommendation is
    /// emitted.
    pub concentration_threshold: Decimal,
    /// Fraction of high-risk projects above which a rebalancing
    /// recommendation is emitted.
    pub high_risk_share_threshold: Decimal,
    /// Portfolios smaller than this get a "broaden your portfolio" nudge.
    pub min_portfolio_size: usize,
    /// Prediction horizons, in months. Must stay in lockstep with
    /// `roi_multipliers` and `adjustment_weights`.
    pub roi_horizons_months: Vec<u32>,
    /// Per-horizon multiplier applied to the portfolio's current ROI.
    pub roi_multipliers: Vec<Decimal>,
    /// Per-horizon weight applied to the success/velocity adjustment factor.
    pub adjustment_weights: Vec<Decimal>,
}

impl Default for AnalyticsParams {
    fn default() -> Self {
        Self {
            neutral_success_rate: dec!(0.5),
            success_spread: dec!(100),
            velocity_weight: dec!(0.5),
            concentration_threshold: dec!(0.6),
            high_risk_share_threshold: dec!(0.3),
            min_portfolio_size: 5,
            roi_horizons_months: vec![3, 6, 12, 24],
            roi_multipliers: vec![dec!(0.25), dec!(0.5), dec!(1.0), dec!(1.5)],
            adjustment_weights: vec![dec!(0.1), dec!(0.2), dec!(0.4), dec!(0.8)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_horizons_are_aligned() {
        let params = AnalyticsParams::default();
        assert_eq!(
            params.roi_horizons_months.len(),
            params.roi_multipliers.len()
        );
        assert_eq!(
            params.roi_horizons_months.len(),
            params.adjustment_weights.len()
        );
    }

    #[test]
    fn default_thresholds_are_fractions() {
        let params = AnalyticsParams::default();
        assert!(params.neutral_success_rate > Decimal::ZERO);
        assert!(params.neutral_success_rate < Decimal::ONE);
        assert!(params.concentration_threshold <= Decimal::ONE);
        assert!(params.high_risk_share_threshold <= Decimal::ONE);
    }
}
