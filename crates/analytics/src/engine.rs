use crate::error::AnalyticsError;
use crate::report::{
    DashboardReport, FundingTrendPoint, PortfolioMetrics, PortfolioOverview, RiskDistribution,
    RiskReport, RoiPrediction,
};
use chrono::{DateTime, Utc};
use configuration::AnalyticsParams;
use core_types::{Investment, Project, ProjectStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// A stateless calculator for deriving portfolio metrics from tracked
/// crowdfunding projects and pledges.
///
/// All operations are pure functions of their arguments; time-dependent
/// calculations take an explicit `as_of` timestamp instead of reading the
/// clock. Degenerate inputs (empty lists, zero totals) yield documented
/// defaults, never errors.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    params: AnalyticsParams,
}

impl AnalyticsEngine {
    /// Creates a new `AnalyticsEngine` with the given tuning parameters.
    pub fn new(params: AnalyticsParams) -> Result<Self, AnalyticsError> {
        // Validate that the parameters are logical before accepting them.
        if params.neutral_success_rate < Decimal::ZERO || params.neutral_success_rate > Decimal::ONE
        {
            return Err(AnalyticsError::InvalidParameters(
                "neutral_success_rate must be between 0 and 1".to_string(),
            ));
        }
        if params.concentration_threshold < Decimal::ZERO
            || params.concentration_threshold > Decimal::ONE
        {
            return Err(AnalyticsError::InvalidParameters(
                "concentration_threshold must be between 0 and 1".to_string(),
            ));
        }
        if params.high_risk_share_threshold < Decimal::ZERO
            || params.high_risk_share_threshold > Decimal::ONE
        {
            return Err(AnalyticsError::InvalidParameters(
                "high_risk_share_threshold must be between 0 and 1".to_string(),
            ));
        }
        if params.roi_horizons_months.is_empty() {
            return Err(AnalyticsError::InvalidParameters(
                "at least one ROI horizon must be configured".to_string(),
            ));
        }
        if params.roi_horizons_months.len() != params.roi_multipliers.len()
            || params.roi_horizons_months.len() != params.adjustment_weights.len()
        {
            return Err(AnalyticsError::InvalidParameters(
                "roi_horizons_months, roi_multipliers and adjustment_weights must have equal lengths"
                    .to_string(),
            ));
        }
        Ok(Self { params })
    }

    /// Counts projects per risk bucket.
    ///
    /// An empty input yields all-zero counts; the bucket counts always sum to
    /// the number of input projects.
    pub fn risk_distribution(&self, projects: &[Project]) -> RiskDistribution {
        let mut distribution = RiskDistribution::default();
        for project in projects {
            distribution.record(project.risk_level);
        }
        distribution
    }

    /// Computes the normalized Herfindahl-Hirschman concentration index over
    /// category funding shares.
    ///
    /// The raw HHI (sum of squared shares) is rescaled against the range
    /// attainable with the observed number of funded categories, so the result
    /// is comparable across portfolios of different breadth: exactly 1 when a
    /// single category holds all funding, near 0 when funding is spread evenly.
    ///
    /// Zero total pledged funding is a defined degenerate case and returns 0
    /// ("no concentration signal"), not an error.
    pub fn concentration_index(&self, projects: &[Project]) -> Result<Decimal, AnalyticsError> {
        validate_projects(projects)?;

        let total: Decimal = projects.iter().map(|p| p.pledged_amount).sum();
        if total.is_zero() {
            return Ok(Decimal::ZERO);
        }

        let mut funded_categories: BTreeMap<&str, Decimal> = BTreeMap::new();
        for project in projects {
            if project.pledged_amount > Decimal::ZERO {
                *funded_categories
                    .entry(project.category.as_str())
                    .or_insert(Decimal::ZERO) += project.pledged_amount;
            }
        }

        if funded_categories.len() == 1 {
            return Ok(Decimal::ONE);
        }

        let hhi: Decimal = funded_categories
            .values()
            .map(|amount| {
                let share = amount / total;
                share * share
            })
            .sum();

        // Rescale from [1/n, 1] onto [0, 1] for the observed category count n.
        let inv_n = Decimal::ONE / Decimal::from(funded_categories.len());
        let normalized = (hhi - inv_n) / (Decimal::ONE - inv_n);
        Ok(normalized.clamp(Decimal::ZERO, Decimal::ONE))
    }

    /// Projects portfolio ROI across the configured horizons.
    ///
    /// The projection is `current_roi * roi_multiplier(h) + adjustment *
    /// adjustment_weight(h)` where the adjustment folds together the
    /// historical success rate's deviation from the neutral baseline and the
    /// mean funding velocity of live campaigns. With no resolved projects the
    /// success rate defaults to the configured neutral baseline, so an empty
    /// portfolio projects a flat 0% at every horizon. This is a heuristic,
    /// not a statistical model.
    pub fn predict_roi(
        &self,
        investments: &[Investment],
        projects: &[Project],
        as_of: DateTime<Utc>,
    ) -> Result<RoiPrediction, AnalyticsError> {
        validate_investments(investments)?;
        validate_projects(projects)?;

        let (success_rate, _) = self.success_rate(projects);

        let total_invested: Decimal = investments.iter().map(|i| i.amount).sum();
        let current_roi = if total_invested.is_zero() {
            Decimal::ZERO
        } else {
            let expected_total: Decimal = investments.iter().map(|i| i.expected_value()).sum();
            (expected_total - total_invested) / total_invested * dec!(100)
        };

        let live: Vec<&Project> = projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Live)
            .collect();
        let avg_velocity = if live.is_empty() {
            Decimal::ZERO
        } else {
            live.iter().map(|p| self.velocity(p, as_of)).sum::<Decimal>()
                / Decimal::from(live.len())
        };

        let adjustment = (success_rate - self.params.neutral_success_rate)
            * self.params.success_spread
            + avg_velocity * self.params.velocity_weight;

        let mut predictions = BTreeMap::new();
        for (i, months) in self.params.roi_horizons_months.iter().enumerate() {
            let projected = current_roi * self.params.roi_multipliers[i]
                + adjustment * self.params.adjustment_weights[i];
            predictions.insert(*months, projected.round_dp(2));
        }

        Ok(RoiPrediction {
            current_roi_pct: current_roi.round_dp(2),
            success_rate,
            adjustment_factor: adjustment.round_dp(4),
            predictions,
        })
    }

    /// Produces a velocity/success-probability snapshot for every live
    /// campaign, sorted by velocity, fastest first.
    ///
    /// A stored AI success probability takes precedence over the linear
    /// trajectory extrapolation when one is attached to the project.
    pub fn funding_trends(
        &self,
        projects: &[Project],
        as_of: DateTime<Utc>,
    ) -> Result<Vec<FundingTrendPoint>, AnalyticsError> {
        validate_projects(projects)?;

        let mut points: Vec<FundingTrendPoint> = projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Live)
            .map(|project| {
                let velocity = self.velocity(project, as_of);
                let funding_percentage = project.funding_percentage();
                let days_remaining = project.days_remaining(as_of);
                let success_probability = match &project.ai_analysis {
                    Some(analysis) => analysis
                        .success_probability
                        .clamp(Decimal::ZERO, dec!(100)),
                    // Extrapolate the current pace linearly to the deadline.
                    None => (funding_percentage + velocity * Decimal::from(days_remaining))
                        .clamp(Decimal::ZERO, dec!(100)),
                };
                FundingTrendPoint {
                    project_id: project.id,
                    name: project.name.clone(),
                    category: project.category.clone(),
                    velocity_pct_per_day: velocity.round_dp(2),
                    funding_percentage: funding_percentage.round_dp(2),
                    success_probability: success_probability.round_dp(1),
                    days_remaining,
                    risk_level: project.risk_level,
                }
            })
            .collect();

        points.sort_by(|a, b| b.velocity_pct_per_day.cmp(&a.velocity_pct_per_day));
        Ok(points)
    }

    /// Evaluates the rule-based recommendation thresholds against aggregate
    /// portfolio metrics. Deterministic for identical inputs; at most five
    /// suggestions are returned.
    pub fn recommendations(&self, metrics: &PortfolioMetrics) -> Vec<String> {
        if metrics.total_projects == 0 && metrics.total_investments == 0 {
            return vec![
                "Start building your investment portfolio to receive portfolio analysis"
                    .to_string(),
            ];
        }

        let mut recommendations = Vec::new();

        if metrics.concentration_index > self.params.concentration_threshold {
            recommendations.push(
                "Consider diversifying across more categories to reduce concentration risk"
                    .to_string(),
            );
        }
        if metrics.high_risk_share > self.params.high_risk_share_threshold {
            recommendations
                .push("Consider reducing exposure to high-risk projects".to_string());
        }
        if metrics.resolved_projects > 0
            && metrics.success_rate < self.params.neutral_success_rate
        {
            recommendations
                .push("Focus on projects with higher success probability".to_string());
        }
        if metrics.total_projects < self.params.min_portfolio_size {
            recommendations.push(
                "Consider increasing portfolio size for better risk distribution".to_string(),
            );
        }
        if recommendations.is_empty() {
            recommendations.push(
                "Your portfolio shows good risk balance - keep monitoring and adjusting"
                    .to_string(),
            );
        }

        recommendations.truncate(5);
        recommendations
    }

    /// Assembles the full dashboard payload from one pass over the inputs.
    ///
    /// Every section is populated for every input; an empty portfolio yields
    /// zeroed/neutral sections rather than missing fields.
    pub fn dashboard(
        &self,
        projects: &[Project],
        investments: &[Investment],
        as_of: DateTime<Utc>,
    ) -> Result<DashboardReport, AnalyticsError> {
        let risk_distribution = self.risk_distribution(projects);
        let concentration_index = self.concentration_index(projects)?;
        let roi = self.predict_roi(investments, projects, as_of)?;
        let trends = self.funding_trends(projects, as_of)?;

        let (success_rate, resolved_projects) = self.success_rate(projects);
        let high_risk_share = risk_distribution.high_share();

        let metrics = PortfolioMetrics {
            total_projects: projects.len(),
            total_investments: investments.len(),
            resolved_projects,
            success_rate,
            concentration_index,
            high_risk_share,
        };
        let recommendations = self.recommendations(&metrics);

        let mut category_distribution: BTreeMap<String, usize> = BTreeMap::new();
        for project in projects {
            *category_distribution
                .entry(project.category.clone())
                .or_insert(0) += 1;
        }

        let total_invested: Decimal = investments.iter().map(|i| i.amount).sum();
        let total_expected_value: Decimal =
            investments.iter().map(|i| i.expected_value()).sum();
        let average_investment = if investments.is_empty() {
            Decimal::ZERO
        } else {
            (total_invested / Decimal::from(investments.len())).round_dp(2)
        };
        let success_rate_pct = if resolved_projects == 0 {
            Decimal::ZERO
        } else {
            (success_rate * dec!(100)).round_dp(2)
        };

        let fully_funded_projects = projects.iter().filter(|p| p.is_fully_funded()).count();

        let overview = PortfolioOverview {
            total_projects: projects.len(),
            fully_funded_projects,
            total_investments: investments.len(),
            total_invested,
            total_expected_value,
            overall_roi_pct: roi.current_roi_pct,
            success_rate_pct,
            average_investment,
        };

        let risk = RiskReport {
            concentration_index,
            diversification_score: Decimal::ONE - concentration_index,
            risk_distribution,
            high_risk_share: high_risk_share.round_dp(4),
            recommendations,
        };

        Ok(DashboardReport {
            overview,
            risk,
            category_distribution,
            roi,
            trends,
            generated_at: as_of,
        })
    }

    /// Historical success rate over resolved projects as `(rate, resolved
    /// count)`. With nothing resolved, the configured neutral baseline stands
    /// in for the rate so callers never divide by zero.
    fn success_rate(&self, projects: &[Project]) -> (Decimal, usize) {
        let successful = projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Successful)
            .count();
        let resolved = projects.iter().filter(|p| p.is_resolved()).count();
        if resolved == 0 {
            return (self.params.neutral_success_rate, 0);
        }
        (Decimal::from(successful) / Decimal::from(resolved), resolved)
    }

    /// Goal completion accumulated per day since launch, in %/day.
    ///
    /// Uses the 1-day launch floor from `Project::days_since_launch` and is
    /// bounded to [0, 100] so over-funded campaigns cannot blow up the scale.
    fn velocity(&self, project: &Project, as_of: DateTime<Utc>) -> Decimal {
        let days = Decimal::from(project.days_since_launch(as_of));
        (project.funding_percentage() / days).clamp(Decimal::ZERO, dec!(100))
    }
}

fn validate_projects(projects: &[Project]) -> Result<(), AnalyticsError> {
    for project in projects {
        if project.goal_amount <= Decimal::ZERO {
            return Err(AnalyticsError::InvalidInput(format!(
                "project {} has a non-positive goal amount",
                project.id
            )));
        }
        if project.pledged_amount < Decimal::ZERO {
            return Err(AnalyticsError::InvalidInput(format!(
                "project {} has a negative pledged amount",
                project.id
            )));
        }
    }
    Ok(())
}

fn validate_investments(investments: &[Investment]) -> Result<(), AnalyticsError> {
    for investment in investments {
        if investment.amount <= Decimal::ZERO {
            return Err(AnalyticsError::InvalidInput(format!(
                "investment {} has a non-positive amount",
                investment.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use core_types::{AiAnalysis, RiskLevel};
    use uuid::Uuid;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn engine() -> AnalyticsEngine {
        AnalyticsEngine::new(AnalyticsParams::default()).unwrap()
    }

    fn project(
        category: &str,
        risk: RiskLevel,
        pledged: Decimal,
        goal: Decimal,
        status: ProjectStatus,
    ) -> Project {
        let launched = as_of() - Duration::days(10);
        Project {
            id: Uuid::new_v4(),
            name: format!("{category} project"),
            creator: "Creator".to_string(),
            category: category.to_string(),
            goal_amount: goal,
            pledged_amount: pledged,
            backers_count: 10,
            launched_at: launched,
            deadline: launched + Duration::days(30),
            status,
            risk_level: risk,
            ai_analysis: None,
            user_id: None,
            created_at: launched,
            updated_at: launched,
        }
    }

    fn investment(amount: Decimal, expected_return: Option<Decimal>) -> Investment {
        let now = as_of();
        Investment {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            amount,
            invested_at: now,
            expected_return,
            reward_tier: None,
            notes: None,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The three-project scenario from the product requirements: one low-risk
    /// fully funded Technology project, one high-risk barely funded Games
    /// project, one medium-risk unfunded Technology project.
    fn scenario_portfolio() -> Vec<Project> {
        vec![
            project(
                "Technology",
                RiskLevel::Low,
                dec!(10000),
                dec!(10000),
                ProjectStatus::Live,
            ),
            project(
                "Games",
                RiskLevel::High,
                dec!(500),
                dec!(50000),
                ProjectStatus::Live,
            ),
            project(
                "Technology",
                RiskLevel::Medium,
                dec!(0),
                dec!(5000),
                ProjectStatus::Live,
            ),
        ]
    }

    #[test]
    fn risk_distribution_counts_sum_to_input_length() {
        let projects = scenario_portfolio();
        let dist = engine().risk_distribution(&projects);
        assert_eq!(dist.low, 1);
        assert_eq!(dist.medium, 1);
        assert_eq!(dist.high, 1);
        assert_eq!(dist.total(), projects.len());
    }

    #[test]
    fn risk_distribution_of_empty_input_is_all_zeros() {
        let dist = engine().risk_distribution(&[]);
        assert_eq!(dist, RiskDistribution::default());
    }

    #[test]
    fn concentration_of_empty_portfolio_is_zero() {
        assert_eq!(engine().concentration_index(&[]).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn concentration_with_zero_total_funding_is_zero() {
        let projects = vec![
            project(
                "Art",
                RiskLevel::Low,
                dec!(0),
                dec!(1000),
                ProjectStatus::Live,
            ),
            project(
                "Games",
                RiskLevel::High,
                dec!(0),
                dec!(2000),
                ProjectStatus::Live,
            ),
        ];
        assert_eq!(
            engine().concentration_index(&projects).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn concentration_of_single_funded_category_is_one() {
        let projects = vec![
            project(
                "Technology",
                RiskLevel::Low,
                dec!(4000),
                dec!(5000),
                ProjectStatus::Live,
            ),
            project(
                "Technology",
                RiskLevel::Medium,
                dec!(1000),
                dec!(2000),
                ProjectStatus::Live,
            ),
        ];
        assert_eq!(
            engine().concentration_index(&projects).unwrap(),
            Decimal::ONE
        );
    }

    #[test]
    fn concentration_is_order_invariant() {
        let eng = engine();
        let mut projects = scenario_portfolio();
        let forward = eng.concentration_index(&projects).unwrap();
        projects.reverse();
        let reversed = eng.concentration_index(&projects).unwrap();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn concentration_leans_toward_dominant_category() {
        // $10,000 Technology vs $500 Games: strongly concentrated.
        let index = engine().concentration_index(&scenario_portfolio()).unwrap();
        assert!(index > dec!(0.6), "expected high concentration, got {index}");
        assert!(index <= Decimal::ONE);
    }

    #[test]
    fn concentration_of_even_spread_is_near_zero() {
        let projects = vec![
            project(
                "Art",
                RiskLevel::Low,
                dec!(1000),
                dec!(1000),
                ProjectStatus::Live,
            ),
            project(
                "Games",
                RiskLevel::Low,
                dec!(1000),
                dec!(1000),
                ProjectStatus::Live,
            ),
            project(
                "Music",
                RiskLevel::Low,
                dec!(1000),
                dec!(1000),
                ProjectStatus::Live,
            ),
        ];
        // Thirds leave a sub-1e-20 rounding residual in Decimal arithmetic.
        let index = engine().concentration_index(&projects).unwrap();
        assert!(index < dec!(0.000001), "expected ~0, got {index}");
    }

    #[test]
    fn concentration_rejects_non_positive_goal() {
        let mut projects = scenario_portfolio();
        projects[0].goal_amount = Decimal::ZERO;
        assert!(matches!(
            engine().concentration_index(&projects),
            Err(AnalyticsError::InvalidInput(_))
        ));
    }

    #[test]
    fn roi_with_no_resolved_projects_uses_neutral_baseline() {
        let eng = engine();
        let prediction = eng.predict_roi(&[], &[], as_of()).unwrap();
        assert_eq!(prediction.success_rate, dec!(0.5));
        assert_eq!(prediction.current_roi_pct, Decimal::ZERO);
        for (_, pct) in &prediction.predictions {
            assert_eq!(*pct, Decimal::ZERO);
        }
        assert_eq!(prediction.predictions.len(), 4);
    }

    #[test]
    fn roi_uses_historical_success_rate_over_resolved_projects() {
        let projects = vec![
            project(
                "Technology",
                RiskLevel::Low,
                dec!(5000),
                dec!(5000),
                ProjectStatus::Successful,
            ),
            project(
                "Games",
                RiskLevel::Medium,
                dec!(100),
                dec!(5000),
                ProjectStatus::Failed,
            ),
            // Live projects are censored: excluded from the rate.
            project(
                "Art",
                RiskLevel::Low,
                dec!(100),
                dec!(5000),
                ProjectStatus::Live,
            ),
        ];
        let prediction = engine().predict_roi(&[], &projects, as_of()).unwrap();
        assert_eq!(prediction.success_rate, dec!(0.5));
    }

    #[test]
    fn roi_projects_positive_returns_for_successful_portfolio() {
        let projects = vec![
            project(
                "Technology",
                RiskLevel::Low,
                dec!(5000),
                dec!(5000),
                ProjectStatus::Successful,
            ),
            project(
                "Games",
                RiskLevel::Low,
                dec!(8000),
                dec!(4000),
                ProjectStatus::Successful,
            ),
        ];
        let investments = vec![investment(dec!(1000), Some(dec!(1200)))];
        let prediction = engine()
            .predict_roi(&investments, &projects, as_of())
            .unwrap();
        assert_eq!(prediction.success_rate, Decimal::ONE);
        assert_eq!(prediction.current_roi_pct, dec!(20));
        // Every horizon should project above the bare current-ROI share since
        // the success adjustment is positive.
        let twelve_month = prediction.predictions[&12];
        assert!(twelve_month > dec!(20), "got {twelve_month}");
    }

    #[test]
    fn roi_rejects_non_positive_investment_amount() {
        let bad = vec![investment(Decimal::ZERO, None)];
        assert!(matches!(
            engine().predict_roi(&bad, &[], as_of()),
            Err(AnalyticsError::InvalidInput(_))
        ));
    }

    #[test]
    fn funding_trends_floor_launch_day_to_one() {
        let mut p = project(
            "Technology",
            RiskLevel::Low,
            dec!(5000),
            dec!(10000),
            ProjectStatus::Live,
        );
        p.launched_at = as_of();
        p.deadline = as_of() + Duration::days(30);
        let trends = engine().funding_trends(&[p], as_of()).unwrap();
        assert_eq!(trends.len(), 1);
        // 50% funded on day "zero": the 1-day floor makes velocity 50%/day.
        assert_eq!(trends[0].velocity_pct_per_day, dec!(50));
    }

    #[test]
    fn funding_trends_bound_overfunded_projects() {
        let mut p = project(
            "Games",
            RiskLevel::Low,
            dec!(30000),
            dec!(10000),
            ProjectStatus::Live,
        );
        p.launched_at = as_of();
        p.deadline = as_of() + Duration::days(20);
        let trends = engine().funding_trends(&[p], as_of()).unwrap();
        let point = &trends[0];
        assert!(point.velocity_pct_per_day >= Decimal::ZERO);
        assert!(point.velocity_pct_per_day <= dec!(100));
        assert!(point.success_probability >= Decimal::ZERO);
        assert!(point.success_probability <= dec!(100));
    }

    #[test]
    fn funding_trends_only_cover_live_projects() {
        let projects = vec![
            project(
                "Technology",
                RiskLevel::Low,
                dec!(5000),
                dec!(5000),
                ProjectStatus::Successful,
            ),
            project(
                "Games",
                RiskLevel::Medium,
                dec!(100),
                dec!(5000),
                ProjectStatus::Live,
            ),
        ];
        let trends = engine().funding_trends(&projects, as_of()).unwrap();
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].category, "Games");
    }

    #[test]
    fn funding_trends_sort_by_velocity_descending() {
        let fast = project(
            "Technology",
            RiskLevel::Low,
            dec!(9000),
            dec!(10000),
            ProjectStatus::Live,
        );
        let slow = project(
            "Games",
            RiskLevel::Medium,
            dec!(500),
            dec!(50000),
            ProjectStatus::Live,
        );
        let trends = engine()
            .funding_trends(&[slow, fast], as_of())
            .unwrap();
        assert_eq!(trends[0].category, "Technology");
        assert!(trends[0].velocity_pct_per_day >= trends[1].velocity_pct_per_day);
    }

    #[test]
    fn stored_ai_probability_takes_precedence() {
        let mut p = project(
            "Design",
            RiskLevel::Medium,
            dec!(100),
            dec!(10000),
            ProjectStatus::Live,
        );
        p.ai_analysis = Some(AiAnalysis {
            success_probability: dec!(42),
            recommendation: "Watch the comments section".to_string(),
            key_factors: vec!["weak launch week".to_string()],
        });
        let trends = engine().funding_trends(&[p], as_of()).unwrap();
        assert_eq!(trends[0].success_probability, dec!(42));
    }

    #[test]
    fn recommendations_for_empty_portfolio() {
        let metrics = PortfolioMetrics {
            total_projects: 0,
            total_investments: 0,
            resolved_projects: 0,
            success_rate: dec!(0.5),
            concentration_index: Decimal::ZERO,
            high_risk_share: Decimal::ZERO,
        };
        let recs = engine().recommendations(&metrics);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("Start building"));
    }

    #[test]
    fn concentrated_portfolio_triggers_diversification_advice() {
        let metrics = PortfolioMetrics {
            total_projects: 8,
            total_investments: 8,
            resolved_projects: 4,
            success_rate: dec!(0.75),
            concentration_index: dec!(0.85),
            high_risk_share: dec!(0.1),
        };
        let recs = engine().recommendations(&metrics);
        assert!(recs.iter().any(|r| r.contains("diversifying")));
    }

    #[test]
    fn recommendations_are_deterministic_and_capped() {
        let metrics = PortfolioMetrics {
            total_projects: 2,
            total_investments: 1,
            resolved_projects: 2,
            success_rate: dec!(0.1),
            concentration_index: dec!(0.9),
            high_risk_share: dec!(0.8),
        };
        let eng = engine();
        let first = eng.recommendations(&metrics);
        let second = eng.recommendations(&metrics);
        assert_eq!(first, second);
        assert!(first.len() <= 5);
        // All four rules fire for this portfolio.
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn balanced_portfolio_gets_the_fallback_message() {
        let metrics = PortfolioMetrics {
            total_projects: 10,
            total_investments: 12,
            resolved_projects: 6,
            success_rate: dec!(0.8),
            concentration_index: dec!(0.2),
            high_risk_share: dec!(0.1),
        };
        let recs = engine().recommendations(&metrics);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("good risk balance"));
    }

    #[test]
    fn dashboard_for_empty_portfolio_is_fully_populated() {
        let report = engine().dashboard(&[], &[], as_of()).unwrap();
        assert_eq!(report.overview, PortfolioOverview::default());
        assert_eq!(report.risk.concentration_index, Decimal::ZERO);
        assert_eq!(report.risk.diversification_score, Decimal::ONE);
        assert!(report.trends.is_empty());
        assert!(report.category_distribution.is_empty());
        assert_eq!(report.risk.recommendations.len(), 1);

        // The serialized payload must be a complete object with no null
        // top-level analytics sections.
        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "overview",
            "risk",
            "category_distribution",
            "roi",
            "trends",
            "generated_at",
        ] {
            assert!(!json[key].is_null(), "missing dashboard section: {key}");
        }
        let back: DashboardReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn dashboard_aggregates_scenario_portfolio() {
        let projects = scenario_portfolio();
        let investments = vec![
            investment(dec!(200), Some(dec!(260))),
            investment(dec!(300), None),
        ];
        let report = engine()
            .dashboard(&projects, &investments, as_of())
            .unwrap();

        assert_eq!(report.overview.total_projects, 3);
        // Only the Technology project at 100% of goal counts as fully funded.
        assert_eq!(report.overview.fully_funded_projects, 1);
        assert_eq!(report.overview.total_investments, 2);
        assert_eq!(report.overview.total_invested, dec!(500));
        assert_eq!(report.overview.average_investment, dec!(250));
        assert_eq!(report.overview.overall_roi_pct, dec!(12));
        // Nothing resolved yet, so the headline rate stays at zero.
        assert_eq!(report.overview.success_rate_pct, Decimal::ZERO);
        assert_eq!(report.category_distribution["Technology"], 2);
        assert_eq!(report.category_distribution["Games"], 1);
        assert_eq!(report.risk.risk_distribution.total(), 3);
        assert_eq!(
            report.risk.diversification_score,
            Decimal::ONE - report.risk.concentration_index
        );
    }

    #[test]
    fn engine_rejects_misaligned_horizon_tables() {
        let mut params = AnalyticsParams::default();
        params.roi_multipliers.pop();
        assert!(matches!(
            AnalyticsEngine::new(params),
            Err(AnalyticsError::InvalidParameters(_))
        ));
    }

    #[test]
    fn engine_rejects_out_of_range_baseline() {
        let params = AnalyticsParams {
            neutral_success_rate: dec!(1.5),
            ..AnalyticsParams::default()
        };
        assert!(matches!(
            AnalyticsEngine::new(params),
            Err(AnalyticsError::InvalidParameters(_))
        ));
    }
}
