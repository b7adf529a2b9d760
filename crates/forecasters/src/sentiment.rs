//! Fixed mappings from the community demand/trend ratings to daily drift and volatility.
//!
//! Demand runs from 0 (worst) to 4 (best). Trend runs 0 (falling) through 3 (rising),
//! and 4 marks a fluctuating market with no direction, so it adds no drift. -1 means
//! unrated and is always neutral. Each table is indexed by `rating + 1`.

use core_types::{PredictionConfig, UNRATED};

const DEMAND_DRIFT: [f64; 6] = [0.0, -0.005, -0.002, 0.0, 0.004, 0.008];
const TREND_DRIFT: [f64; 6] = [0.0, -0.004, -0.001, 0.0, 0.004, 0.0];
const DEMAND_VOLATILITY: [f64; 6] = [1.0, 1.4, 1.2, 1.0, 0.85, 0.7];

fn lookup(table: &[f64; 6], rating: i8) -> f64 {
    let index = i16::from(rating) - i16::from(UNRATED);
    usize::try_from(index)
        .ok()
        .and_then(|i| table.get(i))
        .copied()
        .unwrap_or(table[0])
}

/// Daily drift contributed by the demand rating.
pub fn demand_drift(demand: i8) -> f64 {
    lookup(&DEMAND_DRIFT, demand)
}

/// Daily drift contributed by the trend rating.
pub fn trend_drift(trend: i8) -> f64 {
    lookup(&TREND_DRIFT, trend)
}

/// Volatility multiplier for the demand rating. High demand means a deeper market
/// and smaller swings.
pub fn volatility_multiplier(demand: i8) -> f64 {
    lookup(&DEMAND_VOLATILITY, demand)
}

/// Combined demand and trend drift per day.
pub fn sentiment_drift(config: &PredictionConfig) -> f64 {
    demand_drift(config.demand) + trend_drift(config.trend)
}
