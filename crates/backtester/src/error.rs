use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("Need at least {required} observations to backtest, got {available}.")]
    NotEnoughData { required: usize, available: usize },

    #[error("Forecaster returned {actual} values for a {expected}-step holdout window.")]
    HorizonMismatch { expected: usize, actual: usize },

    #[error("Forecaster produced a non-finite value at step {0}.")]
    NonFiniteForecast(usize),

    #[error("Forecaster failed during backtest: {0}")]
    Forecaster(String),
}
