use serde::{Deserialize, Serialize};

/// The lifecycle state of a crowdfunding campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "project_status", rename_all = "lowercase")]
pub enum ProjectStatus {
    Live,
    Successful,
    Failed,
    Cancelled,
}

impl ProjectStatus {
    /// A project is resolved once its campaign has run to a definitive outcome.
    /// Live and cancelled campaigns carry no success/failure signal.
    pub fn is_resolved(&self) -> bool {
        matches!(self, ProjectStatus::Successful | ProjectStatus::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "risk_level", rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}
