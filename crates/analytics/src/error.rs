use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Analytics parameters from configuration are invalid: {0}")]
    InvalidParameters(String),
}
