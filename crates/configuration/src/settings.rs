use crate::error::ConfigError;
use crate::optimizer_config::HoltWintersGrid;
use serde::{Deserialize, Serialize};

/// The root configuration structure for the forecasting engine.
///
/// Every section falls back to its defaults, so an empty (or missing) `config.toml`
/// yields the reference calibration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sanitizer: SanitizerParams,
    pub volatility: VolatilityParams,
    pub monte_carlo: MonteCarloParams,
    pub ensemble: EnsembleParams,
    pub holt_winters: HoltWintersGrid,
}

/// Thresholds used to discard snipes and outliers relative to a reference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerParams {
    /// A sale below `snipe_ratio * reference` is treated as a snipe.
    pub snipe_ratio: f64,
    /// A sale above `outlier_ratio * reference` is treated as an outlier.
    pub outlier_ratio: f64,
    /// If more than this fraction of points would be removed, sanitization is abandoned.
    pub max_removal_fraction: f64,
}

impl Default for SanitizerParams {
    fn default() -> Self {
        Self {
            snipe_ratio: 0.5,
            outlier_ratio: 3.0,
            max_removal_fraction: 0.7,
        }
    }
}

/// GARCH(1,1) calibration for the statistics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityParams {
    /// Reaction to the latest squared return.
    pub garch_alpha: f64,
    /// Persistence of the previous variance.
    pub garch_beta: f64,
    /// Weight of the recursive estimate; the long-term estimate gets the remainder.
    pub current_weight: f64,
    /// Floor on the elapsed time between two observations, in days.
    pub min_interval_days: f64,
    /// The smallest daily volatility ever reported.
    pub volatility_floor: f64,
}

impl Default for VolatilityParams {
    fn default() -> Self {
        Self {
            garch_alpha: 0.1,
            garch_beta: 0.84,
            current_weight: 0.7,
            min_interval_days: 0.1,
            volatility_floor: 0.001,
        }
    }
}

/// Parameters for the Monte Carlo GBM simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloParams {
    pub paths: usize,
    /// Draw shocks from a Student's t-distribution instead of a standard normal.
    pub fat_tails: bool,
    pub degrees_of_freedom: f64,
    /// Daily geometric decay of the sentiment term.
    pub sentiment_decay: f64,
    pub lower_percentile: f64,
    pub upper_percentile: f64,
}

impl Default for MonteCarloParams {
    fn default() -> Self {
        Self {
            paths: 500,
            fat_tails: true,
            degrees_of_freedom: 4.0,
            sentiment_decay: 0.9,
            lower_percentile: 0.10,
            upper_percentile: 0.90,
        }
    }
}

/// Settings shared by the Flow engine's three forecasting methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleParams {
    /// Number of trailing points held out to score each method.
    pub holdout_window: usize,
    pub ema_period: usize,
    /// Geometric decay applied to the EMA slope at each step ahead.
    pub ema_slope_decay: f64,
    /// Relative distance within which a price snaps to a round number.
    pub snap_tolerance: f64,
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self {
            holdout_window: 14,
            ema_period: 10,
            ema_slope_decay: 0.92,
            snap_tolerance: 0.01,
        }
    }
}

impl Config {
    /// Checks that every section describes a usable calibration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.sanitizer;
        if !(s.snipe_ratio > 0.0 && s.snipe_ratio < 1.0) {
            return Err(invalid("sanitizer.snipe_ratio must be between 0 and 1"));
        }
        if !(s.outlier_ratio > 1.0 && s.outlier_ratio.is_finite()) {
            return Err(invalid("sanitizer.outlier_ratio must be greater than 1"));
        }
        if !(s.max_removal_fraction > 0.0 && s.max_removal_fraction <= 1.0) {
            return Err(invalid("sanitizer.max_removal_fraction must be in (0, 1]"));
        }

        let v = &self.volatility;
        if !(v.garch_alpha >= 0.0 && v.garch_beta >= 0.0 && v.garch_alpha + v.garch_beta < 1.0) {
            return Err(invalid(
                "volatility.garch_alpha and garch_beta must be non-negative and sum to less than 1",
            ));
        }
        if !(0.0..=1.0).contains(&v.current_weight) {
            return Err(invalid("volatility.current_weight must be in [0, 1]"));
        }
        if !(v.min_interval_days > 0.0 && v.min_interval_days.is_finite())
            || !(v.volatility_floor > 0.0 && v.volatility_floor.is_finite())
        {
            return Err(invalid(
                "volatility.min_interval_days and volatility_floor must be positive",
            ));
        }

        let m = &self.monte_carlo;
        if m.paths == 0 {
            return Err(invalid("monte_carlo.paths must be at least 1"));
        }
        if !(m.degrees_of_freedom > 2.0 && m.degrees_of_freedom.is_finite()) {
            return Err(invalid(
                "monte_carlo.degrees_of_freedom must exceed 2 for a finite variance",
            ));
        }
        if !(0.0..=1.0).contains(&m.sentiment_decay) {
            return Err(invalid("monte_carlo.sentiment_decay must be in [0, 1]"));
        }
        if !(0.0 <= m.lower_percentile
            && m.lower_percentile < 0.5
            && 0.5 < m.upper_percentile
            && m.upper_percentile <= 1.0)
        {
            return Err(invalid(
                "monte_carlo percentiles must satisfy 0 <= lower < 0.5 < upper <= 1",
            ));
        }

        let e = &self.ensemble;
        if e.holdout_window == 0 || e.ema_period == 0 {
            return Err(invalid(
                "ensemble.holdout_window and ema_period must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&e.ema_slope_decay) {
            return Err(invalid("ensemble.ema_slope_decay must be in [0, 1]"));
        }
        if !(0.0..0.5).contains(&e.snap_tolerance) {
            return Err(invalid("ensemble.snap_tolerance must be in [0, 0.5)"));
        }

        self.holt_winters.validate()
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
