use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Backtest execution failed within optimizer: {0}")]
    Backtest(#[from] backtester::BacktestError),

    #[error("Parameter generation failed: {0}")]
    ParameterGeneration(String),
}
