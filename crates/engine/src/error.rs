use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid prediction input: {0}")]
    InvalidInput(#[from] core_types::CoreError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] configuration::error::ConfigError),

    #[error("Forecast failed: {0}")]
    Forecast(#[from] forecasters::ForecastError),
}
