use crate::DbError;
use chrono::{DateTime, Utc};
use core_types::{AiAnalysis, Investment, Project, ProjectStatus, RiskLevel};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

/// A row from the `projects` table. The `ai_analysis` JSONB column is decoded
/// into the typed sub-record during conversion to `Project`.
#[derive(Debug, Clone, FromRow)]
pub struct DbProject {
    pub id: Uuid,
    pub name: String,
    pub creator: String,
    pub category: String,
    pub goal_amount: Decimal,
    pub pledged_amount: Decimal,
    pub backers_count: i32,
    pub launched_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub status: ProjectStatus,
    pub risk_level: RiskLevel,
    pub ai_analysis: Option<JsonValue>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbProject> for Project {
    type Error = DbError;

    fn try_from(row: DbProject) -> Result<Self, Self::Error> {
        let ai_analysis = row
            .ai_analysis
            .map(|value| {
                serde_json::from_value::<AiAnalysis>(value).map_err(|e| {
                    DbError::InvalidRecord(format!(
                        "project {} has malformed ai_analysis: {e}",
                        row.id
                    ))
                })
            })
            .transpose()?;

        Ok(Project {
            id: row.id,
            name: row.name,
            creator: row.creator,
            category: row.category,
            goal_amount: row.goal_amount,
            pledged_amount: row.pledged_amount,
            backers_count: row.backers_count,
            launched_at: row.launched_at,
            deadline: row.deadline,
            status: row.status,
            risk_level: row.risk_level,
            ai_analysis,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row from the `investments` table. Maps 1:1 onto the core struct.
#[derive(Debug, Clone, FromRow)]
pub struct DbInvestment {
    pub id: Uuid,
    pub project_id: Uuid,
    pub amount: Decimal,
    pub invested_at: DateTime<Utc>,
    pub expected_return: Option<Decimal>,
    pub reward_tier: Option<String>,
    pub notes: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbInvestment> for Investment {
    fn from(row: DbInvestment) -> Self {
        Investment {
            id: row.id,
            project_id: row.project_id,
            amount: row.amount,
            invested_at: row.invested_at,
            expected_return: row.expected_return,
            reward_tier: row.reward_tier,
            notes: row.notes,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PROJECT_COLUMNS: &str = "id, name, creator, category, goal_amount, pledged_amount, \
     backers_count, launched_at, deadline, status, risk_level, ai_analysis, user_id, \
     created_at, updated_at";

const INVESTMENT_COLUMNS: &str = "id, project_id, amount, invested_at, expected_return, \
     reward_tier, notes, user_id, created_at, updated_at";

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Saves a new project.
    pub async fn insert_project(&self, project: &Project) -> Result<(), DbError> {
        let ai_analysis = project
            .ai_analysis
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DbError::InvalidRecord(format!("ai_analysis not serializable: {e}")))?;

        sqlx::query(
            "INSERT INTO projects (id, name, creator, category, goal_amount, pledged_amount, \
             backers_count, launched_at, deadline, status, risk_level, ai_analysis, user_id, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.creator)
        .bind(&project.category)
        .bind(project.goal_amount)
        .bind(project.pledged_amount)
        .bind(project.backers_count)
        .bind(project.launched_at)
        .bind(project.deadline)
        .bind(project.status)
        .bind(project.risk_level)
        .bind(ai_analysis)
        .bind(project.user_id)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(project_id = %project.id, "Saved project.");
        Ok(())
    }

    /// Fetches a single project by its identifier.
    pub async fn get_project(&self, id: Uuid) -> Result<Project, DbError> {
        let row = sqlx::query_as::<_, DbProject>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("project {id}")))?;

        Project::try_from(row)
    }

    /// Fetches the project list for one user's portfolio, newest first.
    /// `None` returns the globally visible set.
    pub async fn projects_for_user(&self, user_id: Option<Uuid>) -> Result<Vec<Project>, DbError> {
        let rows = match user_id {
            Some(uid) => {
                sqlx::query_as::<_, DbProject>(&format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects WHERE user_id = $1 \
                     ORDER BY created_at DESC"
                ))
                .bind(uid)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DbProject>(&format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Project::try_from).collect()
    }

    /// Refreshes the funding progress of a tracked project.
    pub async fn update_project_funding(
        &self,
        id: Uuid,
        pledged_amount: Decimal,
        backers_count: i32,
        status: ProjectStatus,
    ) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE projects SET pledged_amount = $1, backers_count = $2, status = $3, \
             updated_at = NOW() WHERE id = $4",
        )
        .bind(pledged_amount)
        .bind(backers_count)
        .bind(status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("project {id}")));
        }
        Ok(())
    }

    /// Deletes a project. Investments referencing it are removed by the
    /// ON DELETE CASCADE constraint.
    pub async fn delete_project(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("project {id}")));
        }
        tracing::debug!(project_id = %id, "Deleted project.");
        Ok(())
    }

    /// Saves a new investment.
    pub async fn insert_investment(&self, investment: &Investment) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO investments (id, project_id, amount, invested_at, expected_return, \
             reward_tier, notes, user_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(investment.id)
        .bind(investment.project_id)
        .bind(investment.amount)
        .bind(investment.invested_at)
        .bind(investment.expected_return)
        .bind(&investment.reward_tier)
        .bind(&investment.notes)
        .bind(investment.user_id)
        .bind(investment.created_at)
        .bind(investment.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(investment_id = %investment.id, "Saved investment.");
        Ok(())
    }

    /// Fetches the investment list for one user's portfolio, newest first.
    pub async fn investments_for_user(
        &self,
        user_id: Option<Uuid>,
    ) -> Result<Vec<Investment>, DbError> {
        let rows = match user_id {
            Some(uid) => {
                sqlx::query_as::<_, DbInvestment>(&format!(
                    "SELECT {INVESTMENT_COLUMNS} FROM investments WHERE user_id = $1 \
                     ORDER BY created_at DESC"
                ))
                .bind(uid)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DbInvestment>(&format!(
                    "SELECT {INVESTMENT_COLUMNS} FROM investments ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Investment::from).collect())
    }

    /// Deletes an investment.
    pub async fn delete_investment(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM investments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("investment {id}")));
        }
        Ok(())
    }
}
