//! # Pledgefolio Analytics Engine
//!
//! This crate derives portfolio metrics from a user's tracked crowdfunding
//! projects and pledges: risk distribution, category concentration, ROI
//! projections, funding-velocity trends, and rule-based recommendations.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It performs no I/O; the data-access layer hands it
//!   already-scoped lists of records, and the HTTP layer serializes whatever
//!   it returns.
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless
//!   calculator. Every call is referentially transparent given its inputs
//!   (including an explicit `as_of` timestamp), which makes it safe to invoke
//!   concurrently and trivial to test.
//! - **Defined Degenerate Cases:** Mathematically undefined situations (empty
//!   portfolios, zero total funding, zero resolved projects, zero elapsed
//!   days) return documented defaults rather than errors. Only records that
//!   violate the numeric invariants of the data model produce
//!   `AnalyticsError::InvalidInput`.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The main struct that contains the calculation logic.
//! - `DashboardReport` and its sub-reports: the standardized output structs.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{
    DashboardReport, FundingTrendPoint, PortfolioMetrics, PortfolioOverview, RiskDistribution,
    RiskReport, RoiPrediction,
};
