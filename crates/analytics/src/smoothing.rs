//! Point forecasts from exponential smoothing.
//!
//! Both models work in observation steps, not days. Callers convert using the
//! average spacing of the history.

use crate::error::AnalyticsError;
use ta::indicators::ExponentialMovingAverage as Ema;
use ta::Next as _;

/// Holt's double exponential smoothing (level + trend), extrapolated `horizon` steps.
///
/// Returns an empty forecast for an empty input; a single observation forecasts flat.
pub fn holt_forecast(values: &[f64], alpha: f64, beta: f64, horizon: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let mut level = first;
    let mut trend = values.get(1).map_or(0.0, |second| second - first);

    for &y in &values[1..] {
        let prev_level = level;
        level = alpha * y + (1.0 - alpha) * (level + trend);
        trend = beta * (level - prev_level) + (1.0 - beta) * trend;
    }

    (1..=horizon).map(|h| level + h as f64 * trend).collect()
}

/// EMA forecast whose slope fades geometrically instead of extrapolating linearly.
///
/// The slope is the last one-step change of the EMA; step `k` ahead adds
/// `slope * slope_decay^k` to the running level.
pub fn ema_forecast(
    values: &[f64],
    period: usize,
    slope_decay: f64,
    horizon: usize,
) -> Result<Vec<f64>, AnalyticsError> {
    if values.is_empty() {
        return Err(AnalyticsError::NotEnoughData(
            "EMA forecast needs at least one observation".to_string(),
        ));
    }

    let period = period.clamp(1, values.len());
    let mut ema = Ema::new(period).map_err(|e| {
        AnalyticsError::Calculation(format!("Failed to initialize EMA: {:?}", e))
    })?;

    let smoothed: Vec<f64> = values.iter().map(|&v| ema.next(v)).collect();
    let last = smoothed[smoothed.len() - 1];
    let slope = match smoothed.len() {
        0 | 1 => 0.0,
        n => smoothed[n - 1] - smoothed[n - 2],
    };

    let mut level = last;
    let mut step = slope;
    let forecast = (0..horizon)
        .map(|_| {
            step *= slope_decay;
            level += step;
            level
        })
        .collect();

    Ok(forecast)
}
