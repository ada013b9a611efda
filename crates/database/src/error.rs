use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Database connection configuration error: {0}")]
    ConnectionConfig(String),

    #[error("Stored record is invalid: {0}")]
    InvalidRecord(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}
