//! The GRAVITY engine: projected items whose inflated price decays toward a fair target.

use crate::error::ForecastError;
use crate::ForecastInput;
use core_types::{ForecastBands, PricePoint, SECONDS_PER_DAY};
use rand::RngCore;
use std::f64::consts::LN_2;

/// The trailing window averaged when no usable community value exists.
pub const TRAILING_WINDOW_DAYS: i64 = 14;
/// The newest points are the inflated sales themselves, so they stay out of the average.
pub const EXCLUDED_RECENT_POINTS: usize = 2;
/// Fallback target as a fraction of the inflated price.
pub const HAIRCUT: f64 = 0.5;
/// Half-life, in days, of a projection that is twice its target.
pub const BASE_HALF_LIFE_DAYS: f64 = 14.0;
pub const MIN_HALF_LIFE_DAYS: f64 = 3.0;

pub const UPPER_BASE_SPREAD: f64 = 0.03;
pub const UPPER_SPREAD_GROWTH: f64 = 0.01;
pub const LOWER_BASE_SPREAD: f64 = 0.05;
pub const LOWER_SPREAD_GROWTH: f64 = 0.25;

pub fn forecast(input: &ForecastInput<'_>, _rng: &mut dyn RngCore) -> Result<ForecastBands, ForecastError> {
    let days = input.days();
    let inflated = input.last_price()?;
    let target = reversion_target(input.series, input.config.value, inflated);

    let ratio = inflated / target;
    let half_life = (BASE_HALF_LIFE_DAYS / ratio).max(MIN_HALF_LIFE_DAYS);
    let rate = LN_2 / half_life;
    tracing::debug!(inflated, target, ratio, half_life, "Gravity forecast parameters.");

    let mut predicted = Vec::with_capacity(days);
    let mut upper = Vec::with_capacity(days);
    let mut lower = Vec::with_capacity(days);
    for day in 1..=days {
        let day = day as f64;
        let remaining = (-rate * day).exp();
        let progress = 1.0 - remaining;
        let median = target + (inflated - target) * remaining;

        predicted.push(median);
        upper.push(median * (1.0 + UPPER_BASE_SPREAD + UPPER_SPREAD_GROWTH * day.sqrt()));
        lower.push(median * (1.0 - (LOWER_BASE_SPREAD + LOWER_SPREAD_GROWTH * progress)));
    }

    Ok(ForecastBands::build(input.anchor, &predicted, &upper, &lower)?)
}

/// The price a projected item is expected to fall back to.
///
/// The community value wins when it sits below the inflated price. Otherwise the
/// average of the trailing window (minus the newest points) is used when it is below
/// the inflated price, and failing both a flat haircut applies.
pub fn reversion_target(series: &[PricePoint], value: Option<f64>, inflated: f64) -> f64 {
    if let Some(value) = value.filter(|v| v.is_finite() && *v > 0.0 && *v < inflated) {
        return value;
    }

    if let Some(last) = series.last() {
        let cutoff = last.time - TRAILING_WINDOW_DAYS * SECONDS_PER_DAY;
        let settled = &series[..series.len().saturating_sub(EXCLUDED_RECENT_POINTS)];
        let window: Vec<f64> = settled
            .iter()
            .filter(|p| p.time >= cutoff && p.price > 0.0)
            .map(|p| p.price)
            .collect();
        if !window.is_empty() {
            let average = window.iter().sum::<f64>() / window.len() as f64;
            if average < inflated {
                return average;
            }
        }
    }

    inflated * HAIRCUT
}
