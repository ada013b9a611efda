pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ProjectStatus, RiskLevel};
pub use error::CoreError;
pub use structs::{AiAnalysis, Investment, Project};
