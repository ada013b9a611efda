use chrono::{DateTime, Utc};
use core_types::RiskLevel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Count of projects per risk bucket.
///
/// The invariant `low + medium + high == number of input projects` holds for
/// every input, including the empty list (all zeros).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl RiskDistribution {
    pub fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::High => self.high += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }

    /// Fraction of projects in the high bucket, zero for an empty distribution.
    pub fn high_share(&self) -> Decimal {
        if self.total() == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.high) / Decimal::from(self.total())
    }
}

/// Heuristic ROI projection across configured horizons.
///
/// This is a multiplicative projection from the portfolio's current ROI and a
/// success/velocity adjustment factor, not a statistical model. It carries no
/// guarantee of predictive power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiPrediction {
    /// ROI realized so far: (expected value - invested) / invested, in percent.
    pub current_roi_pct: Decimal,
    /// Historical success rate over resolved projects, as a fraction in [0, 1].
    /// Falls back to the configured neutral baseline when nothing has resolved.
    pub success_rate: Decimal,
    /// The pre-horizon-weighting adjustment, in percentage points.
    pub adjustment_factor: Decimal,
    /// Projected return percentage keyed by horizon length in months.
    pub predictions: BTreeMap<u32, Decimal>,
}

/// Per-project funding trajectory snapshot for live campaigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingTrendPoint {
    pub project_id: Uuid,
    pub name: String,
    pub category: String,
    /// Goal completion accumulated per day, in %/day, bounded to [0, 100].
    pub velocity_pct_per_day: Decimal,
    pub funding_percentage: Decimal,
    /// Predicted chance of reaching the goal by the deadline, in [0, 100].
    pub success_probability: Decimal,
    pub days_remaining: i64,
    pub risk_level: RiskLevel,
}

/// Headline portfolio totals shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioOverview {
    pub total_projects: usize,
    /// Projects whose pledges have met or passed the goal.
    pub fully_funded_projects: usize,
    pub total_investments: usize,
    pub total_invested: Decimal,
    pub total_expected_value: Decimal,
    pub overall_roi_pct: Decimal,
    /// Success rate over resolved projects in percent; zero when nothing has
    /// resolved yet (distinct from the ROI engine's neutral baseline).
    pub success_rate_pct: Decimal,
    pub average_investment: Decimal,
}

/// The aggregate figures the recommendation rules are evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_projects: usize,
    pub total_investments: usize,
    pub resolved_projects: usize,
    /// Success rate as a fraction, baseline-substituted when unresolved.
    pub success_rate: Decimal,
    pub concentration_index: Decimal,
    pub high_risk_share: Decimal,
}

/// Concentration and risk-bucket breakdown plus the recommendations derived
/// from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Normalized Herfindahl-Hirschman index over category funding shares,
    /// in [0, 1]. 1 = all funding in one category, 0 = evenly spread.
    pub concentration_index: Decimal,
    /// Complement of the concentration index: 1 - concentration.
    pub diversification_score: Decimal,
    pub risk_distribution: RiskDistribution,
    pub high_risk_share: Decimal,
    pub recommendations: Vec<String>,
}

/// The full analytics payload served by `GET /api/analytics/dashboard`.
///
/// Every field is populated for every input, including an empty portfolio;
/// callers never receive a null section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub overview: PortfolioOverview,
    pub risk: RiskReport,
    pub category_distribution: BTreeMap<String, usize>,
    pub roi: RoiPrediction,
    pub trends: Vec<FundingTrendPoint>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_distribution_roundtrips_through_json() {
        let dist = RiskDistribution {
            low: 3,
            medium: 7,
            high: 2,
        };
        let json = serde_json::to_string(&dist).unwrap();
        let back: RiskDistribution = serde_json::from_str(&json).unwrap();
        assert_eq!(dist, back);
        assert_eq!(back.total(), 12);
    }

    #[test]
    fn high_share_of_empty_distribution_is_zero() {
        assert_eq!(RiskDistribution::default().high_share(), Decimal::ZERO);
    }
}
