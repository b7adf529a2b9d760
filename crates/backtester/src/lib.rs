//! # Augur Backtester
//!
//! Scores a forecasting method by hiding the tail of a series, forecasting it from the
//! rest and measuring the mean squared error against what actually happened.
//!
//! The method under test is any closure `(training, horizon) -> forecast`, so the same
//! harness serves the smoothing models, the Monte Carlo median and the optimizer's grid
//! search.

use std::fmt::Display;

pub mod error;

pub use error::BacktestError;

/// The fewest observations a method is ever trained on.
pub const MIN_TRAINING_POINTS: usize = 3;

/// The outcome of one backtest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestReport {
    /// Mean squared error over the held-out window.
    pub mse: f64,
    /// Number of points that were actually held out.
    pub holdout: usize,
}

/// The held-out window backtest.
#[derive(Debug, Clone, Copy)]
pub struct Backtester {
    holdout: usize,
}

impl Backtester {
    /// Creates a backtester that holds out up to `holdout` trailing points.
    pub fn new(holdout: usize) -> Self {
        Self { holdout }
    }

    /// The window actually used for a series of `len` points.
    ///
    /// The configured window shrinks for short series so that at least
    /// `MIN_TRAINING_POINTS` remain for training.
    pub fn holdout_for(&self, len: usize) -> usize {
        self.holdout.min(len.saturating_sub(MIN_TRAINING_POINTS))
    }

    /// Backtests an infallible method.
    pub fn evaluate<F>(&self, values: &[f64], mut forecast: F) -> Result<BacktestReport, BacktestError>
    where
        F: FnMut(&[f64], usize) -> Vec<f64>,
    {
        self.try_evaluate(values, |training, horizon| {
            Ok::<_, std::convert::Infallible>(forecast(training, horizon))
        })
    }

    /// Backtests a method that may fail. Its error is reported as `BacktestError::Forecaster`.
    pub fn try_evaluate<F, E>(&self, values: &[f64], mut forecast: F) -> Result<BacktestReport, BacktestError>
    where
        F: FnMut(&[f64], usize) -> Result<Vec<f64>, E>,
        E: Display,
    {
        let holdout = self.holdout_for(values.len());
        if holdout == 0 {
            return Err(BacktestError::NotEnoughData {
                required: MIN_TRAINING_POINTS + 1,
                available: values.len(),
            });
        }

        let split = values.len() - holdout;
        let (training, actual) = values.split_at(split);
        let predicted = forecast(training, holdout).map_err(|e| BacktestError::Forecaster(e.to_string()))?;

        if predicted.len() != holdout {
            return Err(BacktestError::HorizonMismatch {
                expected: holdout,
                actual: predicted.len(),
            });
        }
        if let Some(step) = predicted.iter().position(|v| !v.is_finite()) {
            return Err(BacktestError::NonFiniteForecast(step));
        }

        let mse = mean_squared_error(actual, &predicted);
        tracing::debug!(holdout, mse, "Backtest complete.");
        Ok(BacktestReport { mse, holdout })
    }
}

/// Mean squared error of two equal-length slices. Empty input scores zero.
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    total / actual.len() as f64
}
