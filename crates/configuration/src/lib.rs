// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{AnalyticsParams, Config, ServerSettings};

/// Loads the application configuration from the `config.toml` file.
///
/// The file is optional: when absent, every setting falls back to its
/// documented default, so the server can run out of the box. Environment
/// variables prefixed with `PLEDGEFOLIO_` override file values
/// (e.g., `PLEDGEFOLIO_SERVER__PORT=9000`).
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(config::Environment::with_prefix("PLEDGEFOLIO").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    Ok(config)
}
