//! # Augur Optimizer
//!
//! Fits the Holt-Winters smoothing factors of a series by exhaustive grid search.
//! Each candidate is scored with the held-out window backtest and the candidate with the
//! lowest mean squared error wins. Candidates are evaluated in parallel on the `rayon`
//! pool; the winner is chosen in grid order, so ties always resolve the same way.

use analytics::holt_forecast;
use backtester::Backtester;
use configuration::HoltWintersGrid;
use rayon::prelude::*;

pub mod error;
pub mod generator;

pub use error::OptimizerError;
pub use generator::generate_grid;

/// One point of the smoothing search grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: f64,
}

/// The winning smoothing factors and their backtest error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedSmoothing {
    pub alpha: f64,
    pub beta: f64,
    pub mse: f64,
}

pub struct Optimizer {
    grid: Vec<SmoothingParams>,
    backtester: Backtester,
}

impl Optimizer {
    /// Expands the search grid once so it can be reused across series.
    pub fn new(grid: &HoltWintersGrid, backtester: Backtester) -> Result<Self, OptimizerError> {
        let grid = generate_grid(grid)?;
        Ok(Self { grid, backtester })
    }

    pub fn grid(&self) -> &[SmoothingParams] {
        &self.grid
    }

    /// Finds the (alpha, beta) pair whose Holt forecast best predicts the held-out tail.
    pub fn fit_holt(&self, values: &[f64]) -> Result<FittedSmoothing, OptimizerError> {
        let scores: Vec<Result<f64, OptimizerError>> = self
            .grid
            .par_iter()
            .map(|params| {
                let report = self.backtester.evaluate(values, |training, horizon| {
                    holt_forecast(training, params.alpha, params.beta, horizon)
                })?;
                Ok(report.mse)
            })
            .collect();

        let mut best: Option<FittedSmoothing> = None;
        for (params, score) in self.grid.iter().zip(scores) {
            let mse = score?;
            if best.is_none_or(|b| mse < b.mse) {
                best = Some(FittedSmoothing {
                    alpha: params.alpha,
                    beta: params.beta,
                    mse,
                });
            }
        }

        let fitted = best.ok_or_else(|| {
            OptimizerError::ParameterGeneration("the search grid is empty".to_string())
        })?;
        tracing::debug!(
            alpha = fitted.alpha,
            beta = fitted.beta,
            mse = fitted.mse,
            candidates = self.grid.len(),
            "Fitted Holt-Winters smoothing."
        );
        Ok(fitted)
    }
}
