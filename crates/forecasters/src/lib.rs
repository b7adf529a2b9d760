//! # Augur Forecasting Engines
//!
//! This crate holds the three regime-specific forecasting engines and the logic that
//! decides which one applies to a market.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** Engines receive the cleaned series, its statistics and the tunable
//!   configuration. They load nothing and keep no state between calls.
//! - **Static Dispatch Table:** Each engine is a plain function with the same signature.
//!   `engine_for` maps a `MarketRegime` to its function, and the exhaustive `match`
//!   makes the compiler flag a new regime that has no engine.
//! - **Injected Randomness:** Every engine receives the caller's generator, so a seeded
//!   generator reproduces a forecast exactly.
//!
//! ## Public API
//!
//! - `detect_regime`: Classifies a market as FLOW, INERTIA or GRAVITY.
//! - `ForecastInput`: Everything an engine needs.
//! - `engine_for` / `run_forecast`: The regime to engine dispatch.
//! - `sentiment` and `orderbook`: The fundamental adjustments shared by the engines.

pub mod error;
pub mod factory;
pub mod flow;
pub mod gravity;
pub mod inertia;
pub mod orderbook;
pub mod regime;
pub mod sentiment;

pub use error::ForecastError;
pub use factory::{engine_for, run_forecast, ForecastFn};
pub use regime::{detect_regime, FLOW_MIN_SELLERS, ILLIQUID_SELLERS};

use configuration::Config;
use core_types::{MarketStats, PredictionConfig, PricePoint};

/// Daily log drift is clamped to this magnitude before it is compounded over the horizon.
pub const MAX_DAILY_DRIFT: f64 = 0.1;

/// Everything a forecasting engine reads.
#[derive(Debug, Clone, Copy)]
pub struct ForecastInput<'a> {
    /// The cleaned price history, ascending by time. Never empty.
    pub series: &'a [PricePoint],
    pub config: &'a PredictionConfig,
    pub stats: &'a MarketStats,
    pub settings: &'a Config,
    /// Unix time the first forecast day is counted from.
    pub anchor: i64,
}

impl ForecastInput<'_> {
    pub fn days(&self) -> usize {
        self.config.prediction_days
    }

    /// The most recent observed price.
    pub fn last_price(&self) -> Result<f64, ForecastError> {
        self.series
            .last()
            .map(|p| p.price)
            .ok_or_else(|| ForecastError::NotEnoughData("the price series is empty".to_string()))
    }

    pub fn prices(&self) -> Vec<f64> {
        self.series.iter().map(|p| p.price).collect()
    }
}
