//! # Pledgefolio Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database. It is the system's "permanent archive."
//!
//! ## Architectural Principles
//!
//! - **Adapter Layer:** This crate encapsulates all database-specific logic.
//!   It hands the rest of the application plain `Project` and `Investment`
//!   values and hides the SQL behind the `DbRepository` API. The analytics
//!   engine never touches it directly; handlers fetch here first, then hand
//!   the in-memory lists to the engine.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses a
//!   connection pool (`PgPool`) for high-performance, concurrent access.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: A utility to apply database migrations, ensuring the schema is up-to-date.
//! - `DbRepository`: The main struct that holds the connection pool and provides all
//!   the high-level data access methods (e.g., `projects_for_user`).
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
