//! # Augur Analytics
//!
//! This crate provides the numerical building blocks of the forecasting engine: cleaning
//! a raw price series, measuring its drift and volatility, smoothing-based point
//! forecasts, and the metrics reported next to a forecast.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` and `configuration` (Layer 0).
//! - **Stateless Calculation:** `Sanitizer`, `StatisticsEngine` and `ConfidenceCalculator`
//!   hold only their parameters. They take data in and hand results back, which makes
//!   them easy to test.
//!
//! ## Public API
//!
//! - `Sanitizer`: Removes snipes and outliers relative to a reference value.
//! - `StatisticsEngine`: Time-normalized returns and GARCH(1,1) volatility.
//! - `smoothing`: Holt double exponential smoothing and the decaying-slope EMA forecast.
//! - `metrics`: Liquidity and RAP/Value pricing pressure.
//! - `ConfidenceCalculator` / `ConfidenceReport`: The explainable confidence score.

// Declare the modules that constitute this crate.
pub mod confidence;
pub mod error;
pub mod metrics;
pub mod report;
pub mod sanitizer;
pub mod smoothing;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use confidence::{ConfidenceCalculator, ConfidenceInputs};
pub use error::AnalyticsError;
pub use metrics::{liquidity, pricing_pressure, Liquidity, PricingPressure};
pub use report::ConfidenceReport;
pub use sanitizer::{SanitizeMode, SanitizedSeries, Sanitizer};
pub use smoothing::{ema_forecast, holt_forecast};
pub use stats::StatisticsEngine;
