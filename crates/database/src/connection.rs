use crate::error::DbError;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::time::Duration;

/// Upper bound on pooled connections. Every query the API issues is a
/// short-lived point read or insert, so a small pool suffices.
const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the process-wide PostgreSQL pool.
///
/// The connection string comes from `DATABASE_URL`; a `.env` file is honored
/// when present. The returned pool is cheap to clone, and every
/// `DbRepository` shares it.
pub async fn connect() -> Result<PgPool, DbError> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| DbError::ConnectionConfig("DATABASE_URL is not set".to_string()))?;

    let pool = pool_options().connect(&database_url).await?;
    tracing::info!(max_connections = MAX_CONNECTIONS, "database pool ready");
    Ok(pool)
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Applies any pending migrations from the crate's `migrations/` directory.
///
/// Runs at server startup so a fresh database reaches the current schema
/// before the first query.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_options_carry_the_tuned_limits() {
        let options = pool_options();
        assert_eq!(options.get_max_connections(), MAX_CONNECTIONS);
        assert_eq!(options.get_acquire_timeout(), ACQUIRE_TIMEOUT);
    }
}
