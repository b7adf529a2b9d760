//! The INERTIA engine: illiquid rarities where the last sale anchors the price.

use crate::error::ForecastError;
use crate::regime::is_illiquid;
use crate::{sentiment, ForecastInput, MAX_DAILY_DRIFT};
use core_types::ForecastBands;
use rand::RngCore;

/// Sentiment moves an anchored price harder than it moves a liquid one.
pub const SENTIMENT_AMPLIFIER: f64 = 2.0;
/// Only a fraction of the historical drift carries forward.
pub const HISTORICAL_DRIFT_WEIGHT: f64 = 0.3;
/// Per-day decay of the drift.
pub const DRIFT_DECAY: f64 = 0.98;
/// Band spread grows as `BASE_SPREAD * sqrt(day)` up to a cap.
pub const BASE_SPREAD: f64 = 0.02;
pub const ILLIQUID_SPREAD_CAP: f64 = 0.25;
pub const SPREAD_CAP: f64 = 0.15;

pub fn forecast(input: &ForecastInput<'_>, _rng: &mut dyn RngCore) -> Result<ForecastBands, ForecastError> {
    let days = input.days();
    let anchor_price = input.last_price()?;

    let amplified = sentiment::sentiment_drift(input.config) * SENTIMENT_AMPLIFIER;
    let historical = input.stats.drift * HISTORICAL_DRIFT_WEIGHT;
    let drift = if amplified.abs() >= historical.abs() { amplified } else { historical }
        .clamp(-MAX_DAILY_DRIFT, MAX_DAILY_DRIFT);
    let cap = if is_illiquid(input.config) { ILLIQUID_SPREAD_CAP } else { SPREAD_CAP };
    tracing::debug!(anchor_price, drift, cap, "Inertia forecast parameters.");

    let mut predicted = Vec::with_capacity(days);
    let mut upper = Vec::with_capacity(days);
    let mut lower = Vec::with_capacity(days);
    let mut cumulative = 0.0;
    let mut weight = 1.0;
    for day in 1..=days {
        weight *= DRIFT_DECAY;
        cumulative += drift * weight;
        let price = anchor_price * cumulative.exp();
        let spread = (BASE_SPREAD * (day as f64).sqrt()).min(cap);

        predicted.push(price);
        upper.push(price * (1.0 + spread));
        lower.push(price * (1.0 - spread));
    }

    Ok(ForecastBands::build(input.anchor, &predicted, &upper, &lower)?)
}
