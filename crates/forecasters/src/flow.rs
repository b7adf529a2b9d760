//! The FLOW engine: liquid markets where supply, demand and momentum drive price.
//!
//! Three forecasts are blended: Holt double exponential smoothing with fitted factors,
//! a decaying-slope EMA and the Monte Carlo median. Each is weighted by the inverse of
//! its own backtest error. Bands come from the simulated percentile spread around the
//! blended median.
//!
//! The smoothers work in observation steps while the simulator works in days. Both are
//! brought onto the same clock through the average spacing of the history.

use crate::error::ForecastError;
use crate::{orderbook, sentiment, ForecastInput, MAX_DAILY_DRIFT};
use analytics::{ema_forecast, holt_forecast, pricing_pressure};
use backtester::Backtester;
use core_types::{ForecastBands, MIN_PRICE};
use optimizer::Optimizer;
use rand::RngCore;
use simulator::{MonteCarloSimulator, SimulationInput};

/// Daily drift applied at full RAP/Value pressure.
pub const PRESSURE_DRIFT: f64 = 0.003;

/// Upper band widening at the end of the horizon for a fully thin order book.
pub const GAP_BAND_WIDENING: f64 = 0.25;

/// Floor on a backtest error before it is inverted into a weight.
const MIN_MSE: f64 = 1e-9;

/// Widest observation spacing, in days, the step/day conversion honors.
pub const MAX_STEP_DAYS: f64 = 90.0;

pub fn forecast(input: &ForecastInput<'_>, rng: &mut dyn RngCore) -> Result<ForecastBands, ForecastError> {
    let days = input.days();
    let config = input.config;
    let settings = input.settings;
    let ensemble = &settings.ensemble;
    let prices = input.prices();
    let last_price = input.last_price()?;

    // --- Fundamentals ---
    let pressure = pricing_pressure(config.rap, config.value);
    let pressure_drift = pressure.direction.sign() * PRESSURE_DRIFT * pressure.magnitude;
    let sentiment_drift = sentiment::sentiment_drift(config);
    let volatility = input.stats.volatility * sentiment::volatility_multiplier(config.demand);
    let gap = orderbook::gap_score(&config.order_book);
    let drift = input.stats.drift.clamp(-MAX_DAILY_DRIFT, MAX_DAILY_DRIFT);
    let spacing = step_days(input.stats.avg_data_frequency, settings.volatility.min_interval_days);
    let steps = steps_covering(days as f64 / spacing);

    // --- Stochastic forecast ---
    let simulator = MonteCarloSimulator::new(settings.monte_carlo.clone())?;
    let paths = simulator.simulate(
        &SimulationInput {
            last_price,
            drift: drift + pressure_drift,
            volatility,
            sentiment_drift,
            days,
        },
        &mut *rng,
    )?;

    // --- Technical forecasts ---
    let backtester = Backtester::new(ensemble.holdout_window);
    let fitted = Optimizer::new(&settings.holt_winters, backtester)?.fit_holt(&prices)?;
    let overlay = fundamental_overlay(pressure_drift, sentiment_drift, settings.monte_carlo.sentiment_decay, days);

    let holt_steps = holt_forecast(&prices, fitted.alpha, fitted.beta, steps);
    let holt: Vec<f64> = resample(last_price, &holt_steps, 1.0 / spacing, days)
        .iter()
        .zip(&overlay)
        .map(|(v, m)| v * m)
        .collect();
    let ema_steps = ema_forecast(&prices, ensemble.ema_period, ensemble.ema_slope_decay, steps)?;
    let ema: Vec<f64> = resample(last_price, &ema_steps, 1.0 / spacing, days)
        .iter()
        .zip(&overlay)
        .map(|(v, m)| v * m)
        .collect();

    // --- Ensemble weights from each method's own backtest ---
    // Holdout errors are measured per observation, so the simulator is read back at
    // the observation spacing.
    let ema_mse = backtester
        .try_evaluate(&prices, |training, horizon| {
            ema_forecast(training, ensemble.ema_period, ensemble.ema_slope_decay, horizon)
        })?
        .mse;
    let mc_mse = backtester
        .try_evaluate(&prices, |training, horizon| {
            let start = training.last().copied().unwrap_or(last_price);
            simulator
                .simulate(
                    &SimulationInput {
                        last_price: start,
                        drift,
                        volatility: input.stats.volatility,
                        sentiment_drift: 0.0,
                        days: steps_covering(horizon as f64 * spacing),
                    },
                    &mut *rng,
                )
                .map(|p| resample(start, &p.median, spacing, horizon))
        })?
        .mse;
    let weights = ensemble_weights(&[fitted.mse, ema_mse, mc_mse]);
    tracing::debug!(
        holt_mse = fitted.mse,
        ema_mse,
        mc_mse,
        holt_weight = weights[0],
        ema_weight = weights[1],
        mc_weight = weights[2],
        "Flow ensemble weights."
    );

    // --- Assemble ---
    let mut predicted = Vec::with_capacity(days);
    let mut upper = Vec::with_capacity(days);
    let mut lower = Vec::with_capacity(days);
    for day in 0..days {
        let median = paths.median[day];
        let blended = (weights[0] * holt[day] + weights[1] * ema[day] + weights[2] * median).max(MIN_PRICE);
        let widening = 1.0 + gap * GAP_BAND_WIDENING * ((day + 1) as f64 / days as f64).sqrt();

        predicted.push(snap_to_round_number(blended, ensemble.snap_tolerance));
        upper.push(blended * paths.upper[day] / median * widening);
        lower.push(blended * paths.lower[day] / median);
    }

    Ok(ForecastBands::build(input.anchor, &predicted, &upper, &lower)?)
}

/// Days between observations used to convert steps to days, bounded to
/// `[min_days, MAX_STEP_DAYS]`.
pub fn step_days(avg_data_frequency: f64, min_days: f64) -> f64 {
    if avg_data_frequency.is_finite() {
        avg_data_frequency.clamp(min_days, MAX_STEP_DAYS)
    } else {
        1.0
    }
}

/// Whole units needed to reach `span`, plus one so the last position can interpolate.
fn steps_covering(span: f64) -> usize {
    span.ceil() as usize + 1
}

/// Reads `count` values off a forecast sampled once per unit.
///
/// `forecast[j]` sits at position `j + 1` and `origin` at position 0. Output `i` is the
/// linearly interpolated value at position `(i + 1) * spacing`; positions past the end
/// hold the last value.
pub fn resample(origin: f64, forecast: &[f64], spacing: f64, count: usize) -> Vec<f64> {
    let at = |k: usize| match k {
        0 => origin,
        k => forecast.get(k - 1).or(forecast.last()).copied().unwrap_or(origin),
    };
    (1..=count)
        .map(|i| {
            let position = i as f64 * spacing;
            let below = position.floor() as usize;
            let fraction = position - below as f64;
            at(below) + fraction * (at(below + 1) - at(below))
        })
        .collect()
}

/// Cumulative price multiplier of the fundamental drift for each forecast day.
///
/// Matches the simulator: pressure is constant and sentiment decays geometrically
/// after the first day.
pub fn fundamental_overlay(pressure_drift: f64, sentiment_drift: f64, decay: f64, days: usize) -> Vec<f64> {
    let mut cumulative = 0.0;
    let mut sentiment = sentiment_drift;
    (0..days)
        .map(|_| {
            cumulative += pressure_drift + sentiment;
            sentiment *= decay;
            cumulative.exp()
        })
        .collect()
}

/// Normalized inverse-MSE weights. Falls back to equal weights if every error is unusable.
pub fn ensemble_weights(errors: &[f64]) -> Vec<f64> {
    let inverse: Vec<f64> = errors
        .iter()
        .map(|mse| if mse.is_finite() { 1.0 / mse.max(MIN_MSE) } else { 0.0 })
        .collect();
    let total: f64 = inverse.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return vec![1.0 / errors.len() as f64; errors.len()];
    }
    inverse.iter().map(|w| w / total).collect()
}

/// Snaps a price to the nearest multiple of half its leading power of ten when it is
/// within `tolerance` (relative) of it. 4_980 becomes 5_000; 4_700 is left alone.
pub fn snap_to_round_number(price: f64, tolerance: f64) -> f64 {
    if !(price.is_finite() && price >= 1.0) {
        return price;
    }
    let unit = 10f64.powf(price.log10().floor()) / 2.0;
    let nearest = (price / unit).round() * unit;
    if nearest > 0.0 && (price - nearest).abs() / price <= tolerance {
        nearest
    } else {
        price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{anchor_of, daily_series, spaced_series, stats_for};
    use configuration::Config;
    use core_types::{OrderBookEntry, PredictionConfig, PricePoint};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rising_prices() -> Vec<f64> {
        (0..20).map(|i| 1000.0 * 1.005f64.powi(i)).collect()
    }

    fn run(config: &PredictionConfig, seed: u64) -> ForecastBands {
        run_series(&daily_series(&rising_prices()), config, seed)
    }

    fn run_series(series: &[PricePoint], config: &PredictionConfig, seed: u64) -> ForecastBands {
        let settings = Config::default();
        let stats = stats_for(series, &settings);
        let input = ForecastInput {
            series,
            config,
            stats: &stats,
            settings: &settings,
            anchor: anchor_of(series),
        };
        forecast(&input, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    fn liquid_config() -> PredictionConfig {
        PredictionConfig {
            sellers: Some(20),
            demand: 3,
            trend: 3,
            rap: Some(1100.0),
            value: Some(1000.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_forecast_shape_and_ordering() {
        let bands = run(&liquid_config(), 42);
        assert_eq!(bands.len(), 30);
        for day in 0..30 {
            assert!(bands.lower_band[day].price <= bands.predicted[day].price);
            assert!(bands.predicted[day].price <= bands.upper_band[day].price);
            assert!(bands.lower_band[day].price >= 1.0);
        }
    }

    #[test]
    fn test_same_seed_same_forecast() {
        assert_eq!(run(&liquid_config(), 7), run(&liquid_config(), 7));
    }

    #[test]
    fn test_positive_sentiment_lifts_forecast() {
        let neutral = run(&PredictionConfig { sellers: Some(20), ..Default::default() }, 3);
        let bullish = run(&liquid_config(), 3);
        assert!(bullish.predicted[29].price > neutral.predicted[29].price);
    }

    #[test]
    fn test_thin_order_book_widens_upper_band() {
        let dense = run(&liquid_config(), 11);
        let thin = run(
            &PredictionConfig {
                order_book: [1000.0, 1500.0, 2500.0]
                    .iter()
                    .map(|&price| OrderBookEntry { price, seller_id: None })
                    .collect(),
                ..liquid_config()
            },
            11,
        );
        assert!(thin.upper_band[29].price > dense.upper_band[29].price);
        assert_eq!(thin.predicted, dense.predicted);
    }

    #[test]
    fn test_overlay_compounds_drift() {
        let overlay = fundamental_overlay(0.001, 0.01, 0.5, 3);
        assert!((overlay[0] - 0.011f64.exp()).abs() < 1e-12);
        assert!((overlay[1] - (0.011f64 + 0.006).exp()).abs() < 1e-12);
        assert!((overlay[2] - (0.017f64 + 0.0035).exp()).abs() < 1e-12);
        assert!(fundamental_overlay(0.0, 0.0, 0.9, 5).iter().all(|&m| m == 1.0));
    }

    #[test]
    fn test_weights_favor_lower_error() {
        let weights = ensemble_weights(&[1.0, 2.0, 4.0]);
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((weights[0] - 4.0 / 7.0).abs() < 1e-12);
        assert!(weights[0] > weights[1] && weights[1] > weights[2]);
    }

    #[test]
    fn test_weights_handle_perfect_and_broken_methods() {
        let weights = ensemble_weights(&[0.0, 1.0, f64::INFINITY]);
        assert!(weights[0] > 0.99);
        assert_eq!(weights[2], 0.0);

        let fallback = ensemble_weights(&[f64::INFINITY, f64::INFINITY]);
        assert_eq!(fallback, vec![0.5, 0.5]);
    }

    #[test]
    fn test_snap_to_round_number() {
        assert_eq!(snap_to_round_number(4_980.0, 0.01), 5_000.0);
        assert_eq!(snap_to_round_number(1_004.0, 0.01), 1_000.0);
        assert_eq!(snap_to_round_number(4_700.0, 0.01), 4_700.0);
        assert_eq!(snap_to_round_number(151.0, 0.01), 150.0);
        assert_eq!(snap_to_round_number(0.5, 0.01), 0.5);
    }

    #[test]
    fn test_weekly_and_daily_histories_agree_per_day() {
        // Both histories grow 10% a week; one is sampled weekly, the other daily.
        let weekly_growth = 1.1f64;
        let daily_rate = weekly_growth.ln() / 7.0;
        let weekly: Vec<f64> = (0..10).map(|i| 1000.0 * weekly_growth.powi(i)).collect();
        let daily: Vec<f64> = (0..64).map(|d| 1000.0 * (daily_rate * d as f64).exp()).collect();
        let config = PredictionConfig { sellers: Some(50), ..Default::default() };

        let from_weekly = run_series(&spaced_series(&weekly, 7), &config, 5).predicted[29].price;
        let from_daily = run_series(&daily_series(&daily), &config, 5).predicted[29].price;
        let implied = weekly[9] * (daily_rate * 30.0).exp();

        assert!((from_weekly / implied - 1.0).abs() < 0.1, "weekly {from_weekly} vs {implied}");
        assert!((from_daily / implied - 1.0).abs() < 0.1, "daily {from_daily} vs {implied}");
        assert!((from_weekly / from_daily - 1.0).abs() < 0.1);
    }

    #[test]
    fn test_step_days_bounds_spacing() {
        assert_eq!(step_days(7.0, 0.1), 7.0);
        assert_eq!(step_days(0.01, 0.1), 0.1);
        assert_eq!(step_days(400.0, 0.1), MAX_STEP_DAYS);
        assert_eq!(step_days(f64::NAN, 0.1), 1.0);
    }

    #[test]
    fn test_resample_interpolates_between_steps() {
        let steps = [110.0, 120.0, 130.0];
        assert_eq!(resample(100.0, &steps, 1.0, 3), vec![110.0, 120.0, 130.0]);

        let halves = resample(100.0, &steps, 0.5, 4);
        assert!((halves[0] - 105.0).abs() < 1e-12);
        assert!((halves[3] - 120.0).abs() < 1e-12);

        // Past the end holds the last value.
        assert_eq!(resample(100.0, &steps, 2.0, 2), vec![120.0, 130.0]);
    }
}
