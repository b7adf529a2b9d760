use analytics::AnalyticsError;
use backtester::BacktestError;
use core_types::CoreError;
use optimizer::OptimizerError;
use simulator::SimulationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Forecast engine received too little data: {0}")]
    NotEnoughData(String),

    #[error("Forecast output is invalid: {0}")]
    Core(#[from] CoreError),

    #[error("An error occurred during analytics calculation: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Monte Carlo simulation failed: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Backtest failed: {0}")]
    Backtest(#[from] BacktestError),

    #[error("Smoothing parameter search failed: {0}")]
    Optimizer(#[from] OptimizerError),
}
