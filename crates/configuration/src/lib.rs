use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod optimizer_config;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use optimizer_config::{HoltWintersGrid, ParameterRange};
pub use settings::{Config, EnsembleParams, MonteCarloParams, SanitizerParams, VolatilityParams};

/// Loads the engine configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the configuration file,
/// deserializes it into our strongly-typed `Config` struct, validates it, and returns it.
/// A missing file is not an error: every section falls back to its defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Loaded engine configuration.");
    Ok(config)
}
