use crate::{error::AppError, AppState};
use analytics::{DashboardReport, FundingTrendPoint, RiskReport};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use core_types::{AiAnalysis, Investment, Project, ProjectStatus, RiskLevel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Query parameters scoping a request to one user's portfolio. Absent means
/// the globally visible set.
#[derive(Debug, Deserialize)]
pub struct PortfolioScope {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub user_id: Option<Uuid>,
    #[serde(default = "default_trend_days")]
    pub days: i64,
}
fn default_trend_days() -> i64 {
    30
}

#[derive(Debug, Serialize)]
pub struct FundingTrendsResponse {
    pub trends: Vec<FundingTrendPoint>,
}

/// # GET /api/analytics/dashboard
/// Computes the full analytics payload for the scoped portfolio.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(scope): Query<PortfolioScope>,
) -> Result<Json<DashboardReport>, AppError> {
    let projects = state.db_repo.projects_for_user(scope.user_id).await?;
    let investments = state.db_repo.investments_for_user(scope.user_id).await?;
    let report = state
        .engine
        .dashboard(&projects, &investments, Utc::now())?;
    Ok(Json(report))
}

/// # GET /api/analytics/funding-trends?days=N
/// Velocity/success-probability pairs for live projects tracked in the last
/// `days` days (default 30).
pub async fn get_funding_trends(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<FundingTrendsResponse>, AppError> {
    let as_of = Utc::now();
    let cutoff = as_of - Duration::days(query.days.max(0));
    let projects: Vec<Project> = state
        .db_repo
        .projects_for_user(query.user_id)
        .await?
        .into_iter()
        .filter(|p| p.created_at >= cutoff)
        .collect();
    let trends = state.engine.funding_trends(&projects, as_of)?;
    Ok(Json(FundingTrendsResponse { trends }))
}

/// # GET /api/analytics/risk
/// Concentration index, risk-bucket breakdown and recommendations.
pub async fn get_risk_report(
    State(state): State<Arc<AppState>>,
    Query(scope): Query<PortfolioScope>,
) -> Result<Json<RiskReport>, AppError> {
    let projects = state.db_repo.projects_for_user(scope.user_id).await?;
    let investments = state.db_repo.investments_for_user(scope.user_id).await?;
    let report = state
        .engine
        .dashboard(&projects, &investments, Utc::now())?;
    Ok(Json(report.risk))
}

/// # GET /api/projects
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(scope): Query<PortfolioScope>,
) -> Result<Json<Vec<Project>>, AppError> {
    let projects = state.db_repo.projects_for_user(scope.user_id).await?;
    Ok(Json(projects))
}

/// The payload accepted when tracking a new project.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub creator: String,
    pub category: String,
    pub goal_amount: Decimal,
    #[serde(default)]
    pub pledged_amount: Decimal,
    #[serde(default)]
    pub backers_count: i32,
    pub launched_at: Option<DateTime<Utc>>,
    pub deadline: DateTime<Utc>,
    pub status: Option<ProjectStatus>,
    pub risk_level: Option<RiskLevel>,
    pub ai_analysis: Option<AiAnalysis>,
    pub user_id: Option<Uuid>,
}

/// # POST /api/projects
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let now = Utc::now();
    let project = Project {
        id: Uuid::new_v4(),
        name: payload.name,
        creator: payload.creator,
        category: title_case(&payload.category),
        goal_amount: payload.goal_amount,
        pledged_amount: payload.pledged_amount,
        backers_count: payload.backers_count,
        launched_at: payload.launched_at.unwrap_or(now),
        deadline: payload.deadline,
        status: payload.status.unwrap_or(ProjectStatus::Live),
        risk_level: payload.risk_level.unwrap_or(RiskLevel::Medium),
        ai_analysis: payload.ai_analysis,
        user_id: payload.user_id,
        created_at: now,
        updated_at: now,
    };
    // Fail fast at the input boundary; the analytics engine assumes
    // pre-validated records.
    project.validate()?;
    state.db_repo.insert_project(&project).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// # GET /api/projects/:id
pub async fn get_project(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Project>, AppError> {
    let project = state.db_repo.get_project(id).await?;
    Ok(Json(project))
}

/// The payload accepted when refreshing a project's funding progress.
#[derive(Debug, Deserialize)]
pub struct UpdateFundingRequest {
    pub pledged_amount: Decimal,
    pub backers_count: i32,
    pub status: ProjectStatus,
}

/// # PATCH /api/projects/:id/funding
/// Refreshes the pledge totals and status of a tracked campaign.
pub async fn update_project_funding(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateFundingRequest>,
) -> Result<Json<Project>, AppError> {
    if payload.pledged_amount < Decimal::ZERO {
        return Err(core_types::CoreError::InvalidInput(
            "pledged_amount".to_string(),
            "must not be negative".to_string(),
        )
        .into());
    }
    state
        .db_repo
        .update_project_funding(id, payload.pledged_amount, payload.backers_count, payload.status)
        .await?;
    let project = state.db_repo.get_project(id).await?;
    Ok(Json(project))
}

/// # DELETE /api/projects/:id
pub async fn delete_project(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    state.db_repo.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// # GET /api/investments
pub async fn list_investments(
    State(state): State<Arc<AppState>>,
    Query(scope): Query<PortfolioScope>,
) -> Result<Json<Vec<Investment>>, AppError> {
    let investments = state.db_repo.investments_for_user(scope.user_id).await?;
    Ok(Json(investments))
}

/// The payload accepted when recording a new pledge.
#[derive(Debug, Deserialize)]
pub struct CreateInvestmentRequest {
    pub project_id: Uuid,
    pub amount: Decimal,
    pub invested_at: Option<DateTime<Utc>>,
    pub expected_return: Option<Decimal>,
    pub reward_tier: Option<String>,
    pub notes: Option<String>,
    pub user_id: Option<Uuid>,
}

/// # POST /api/investments
pub async fn create_investment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateInvestmentRequest>,
) -> Result<(StatusCode, Json<Investment>), AppError> {
    // The referenced project must exist; surfaces as 404 otherwise.
    state.db_repo.get_project(payload.project_id).await?;

    let now = Utc::now();
    let investment = Investment {
        id: Uuid::new_v4(),
        project_id: payload.project_id,
        amount: payload.amount,
        invested_at: payload.invested_at.unwrap_or(now),
        expected_return: payload.expected_return,
        reward_tier: payload.reward_tier,
        notes: payload.notes,
        user_id: payload.user_id,
        created_at: now,
        updated_at: now,
    };
    investment.validate()?;
    state.db_repo.insert_investment(&investment).await?;
    Ok((StatusCode::CREATED, Json(investment)))
}

/// # DELETE /api/investments/:id
pub async fn delete_investment(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    state.db_repo.delete_investment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Normalizes a category label to title case ("film & video" -> "Film & Video").
fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_normalizes_categories() {
        assert_eq!(title_case("technology"), "Technology");
        assert_eq!(title_case("film & video"), "Film & Video");
        assert_eq!(title_case("  games "), "Games");
    }

    #[test]
    fn trend_query_days_defaults_to_thirty() {
        let query: TrendQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.days, 30);
        assert!(query.user_id.is_none());
    }
}
