use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Simulator received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Failed to construct shock distribution: {0}")]
    Distribution(String),
}
