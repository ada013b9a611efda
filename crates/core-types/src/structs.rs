use crate::enums::{ProjectStatus, RiskLevel};
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The AI-generated commentary attached to a project by the external analysis
/// collaborator. The engine only reads `success_probability` from it; the text
/// fields are passed through to the API untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    /// Predicted probability of the campaign succeeding, expressed in [0, 100].
    pub success_probability: Decimal,
    pub recommendation: String,
    pub key_factors: Vec<String>,
}

/// A Kickstarter crowdfunding campaign being tracked in a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub creator: String,
    /// Category label (e.g., "Technology", "Games"). Stored normalized to
    /// title case by the input layer.
    pub category: String,
    pub goal_amount: Decimal,
    pub pledged_amount: Decimal,
    pub backers_count: i32,
    pub launched_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub status: ProjectStatus,
    pub risk_level: RiskLevel,
    pub ai_analysis: Option<AiAnalysis>,
    /// Owning user for multi-user deployments. `None` means globally visible.
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Validates the numeric invariants the analytics formulas depend on.
    ///
    /// This runs at the input boundary (request handlers, importers) so that
    /// downstream consumers can assume well-formed records.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.goal_amount <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "goal_amount".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        if self.pledged_amount < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "pledged_amount".to_string(),
                "must not be negative".to_string(),
            ));
        }
        if self.deadline <= self.launched_at {
            return Err(CoreError::InvalidInput(
                "deadline".to_string(),
                "must be after the launch date".to_string(),
            ));
        }
        Ok(())
    }

    /// Pledged amount as a percentage of the goal. Returns zero for a
    /// non-positive goal rather than dividing by it.
    pub fn funding_percentage(&self) -> Decimal {
        if self.goal_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.pledged_amount / self.goal_amount) * dec!(100)
    }

    /// Whole days until the deadline, floored at zero for expired campaigns.
    pub fn days_remaining(&self, as_of: DateTime<Utc>) -> i64 {
        (self.deadline - as_of).num_days().max(0)
    }

    /// Whole days since launch, floored at one so that velocity calculations
    /// for campaigns launched "today" never divide by zero.
    pub fn days_since_launch(&self, as_of: DateTime<Utc>) -> i64 {
        (as_of - self.launched_at).num_days().max(1)
    }

    pub fn is_resolved(&self) -> bool {
        self.status.is_resolved()
    }

    pub fn is_fully_funded(&self) -> bool {
        self.pledged_amount >= self.goal_amount
    }
}

/// A single pledge made into a tracked project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: Uuid,
    pub project_id: Uuid,
    pub amount: Decimal,
    pub invested_at: DateTime<Utc>,
    /// The return the backer expects to realize, when known. Falls back to the
    /// pledged amount in valuation calculations.
    pub expected_return: Option<Decimal>,
    pub reward_tier: Option<String>,
    pub notes: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Investment {
    /// Validates the numeric invariants the analytics formulas depend on.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.amount <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "amount".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        if let Some(expected) = self.expected_return {
            if expected < Decimal::ZERO {
                return Err(CoreError::InvalidInput(
                    "expected_return".to_string(),
                    "must not be negative".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The value used for ROI calculations: the expected return when recorded,
    /// otherwise the original pledge amount (a neutral assumption).
    pub fn expected_value(&self) -> Decimal {
        self.expected_return.unwrap_or(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_project() -> Project {
        let launched = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Project {
            id: Uuid::new_v4(),
            name: "Modular Synth".to_string(),
            creator: "Ada".to_string(),
            category: "Technology".to_string(),
            goal_amount: dec!(10000),
            pledged_amount: dec!(2500),
            backers_count: 40,
            launched_at: launched,
            deadline: launched + chrono::Duration::days(30),
            status: ProjectStatus::Live,
            risk_level: RiskLevel::Medium,
            ai_analysis: None,
            user_id: None,
            created_at: launched,
            updated_at: launched,
        }
    }

    #[test]
    fn funding_percentage_is_relative_to_goal() {
        let project = sample_project();
        assert_eq!(project.funding_percentage(), dec!(25));
    }

    #[test]
    fn days_since_launch_floors_at_one() {
        let project = sample_project();
        // Queried at the exact launch instant: zero elapsed days, floored to 1.
        assert_eq!(project.days_since_launch(project.launched_at), 1);
        let later = project.launched_at + chrono::Duration::days(10);
        assert_eq!(project.days_since_launch(later), 10);
    }

    #[test]
    fn days_remaining_floors_at_zero() {
        let project = sample_project();
        let after_deadline = project.deadline + chrono::Duration::days(5);
        assert_eq!(project.days_remaining(after_deadline), 0);
    }

    #[test]
    fn validate_rejects_non_positive_goal() {
        let mut project = sample_project();
        project.goal_amount = Decimal::ZERO;
        assert!(project.validate().is_err());
    }

    #[test]
    fn validate_rejects_deadline_before_launch() {
        let mut project = sample_project();
        project.deadline = project.launched_at - chrono::Duration::days(1);
        assert!(project.validate().is_err());
    }

    #[test]
    fn fully_funded_at_or_above_goal() {
        let mut project = sample_project();
        assert!(!project.is_fully_funded());
        project.pledged_amount = project.goal_amount;
        assert!(project.is_fully_funded());
        project.pledged_amount = project.goal_amount + dec!(1);
        assert!(project.is_fully_funded());
    }

    #[test]
    fn resolved_statuses() {
        assert!(ProjectStatus::Successful.is_resolved());
        assert!(ProjectStatus::Failed.is_resolved());
        assert!(!ProjectStatus::Live.is_resolved());
        assert!(!ProjectStatus::Cancelled.is_resolved());
    }

    #[test]
    fn investment_expected_value_falls_back_to_amount() {
        let now = Utc::now();
        let investment = Investment {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            amount: dec!(150),
            invested_at: now,
            expected_return: None,
            reward_tier: None,
            notes: None,
            user_id: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(investment.expected_value(), dec!(150));
    }
}
