//! End-to-end tests of the prediction pipeline.

use configuration::Config;
use core_types::{
    ConfidenceLevel, MarketRegime, OrderBookEntry, PredictionConfig, PredictionResult, PricePoint,
    MAX_PREDICTION_DAYS, SECONDS_PER_DAY,
};
use engine::{EngineError, PredictionEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;

// 2100-01-01. Histories end in the future so the default clock never moves the anchor.
const START: i64 = 4_102_444_800;

fn engine() -> PredictionEngine {
    PredictionEngine::new(Config::default()).unwrap()
}

fn daily(prices: &[f64]) -> Vec<PricePoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint::at(START + i as i64 * SECONDS_PER_DAY, price))
        .collect()
}

fn predict(series: &[PricePoint], config: &PredictionConfig, seed: u64) -> PredictionResult {
    let last = series.last().map_or(START, |p| p.time);
    engine()
        .generate_full_prediction_at(series, config, last, &mut StdRng::seed_from_u64(seed))
        .unwrap()
}

fn assert_well_formed(result: &PredictionResult, days: usize) {
    assert_eq!(result.predicted.len(), days);
    assert_eq!(result.upper_band.len(), days);
    assert_eq!(result.lower_band.len(), days);
    for day in 0..days {
        let (lo, mid, hi) = (
            result.lower_band[day].price,
            result.predicted[day].price,
            result.upper_band[day].price,
        );
        assert!(lo.is_finite() && mid.is_finite() && hi.is_finite());
        assert!(lo >= 1.0);
        assert!(lo <= mid && mid <= hi, "day {}: {} <= {} <= {}", day, lo, mid, hi);
        assert_eq!(result.predicted[day].time, result.upper_band[day].time);
        assert_eq!(result.predicted[day].time, result.lower_band[day].time);
        if day > 0 {
            assert_eq!(
                result.predicted[day].time - result.predicted[day - 1].time,
                SECONDS_PER_DAY
            );
        }
    }
}

fn rising_market() -> (Vec<PricePoint>, PredictionConfig) {
    let prices: Vec<f64> = (0..20).map(|i| 1000.0 * 1.1f64.powf(i as f64 / 19.0)).collect();
    let config = PredictionConfig {
        sellers: Some(20),
        demand: 3,
        trend: 3,
        rap: Some(1100.0),
        value: Some(1000.0),
        ..Default::default()
    };
    (daily(&prices), config)
}

fn projected_market() -> (Vec<PricePoint>, PredictionConfig) {
    let mut prices: Vec<f64> = (0..15)
        .map(|i| if i % 2 == 0 { 9900.0 } else { 10_100.0 })
        .collect();
    prices.push(10_000.0);
    let config = PredictionConfig {
        sellers: Some(40),
        value: Some(3000.0),
        is_projected: true,
        ..Default::default()
    };
    (daily(&prices), config)
}

#[test]
fn test_liquid_rising_market() {
    let (series, config) = rising_market();
    let result = predict(&series, &config, 42);

    assert_eq!(result.regime, MarketRegime::Flow);
    assert_well_formed(&result, 30);
    assert!(result.predicted[29].price > 1100.0);
    assert!(result.confidence_score >= 45);
    assert_ne!(result.confidence_level, ConfidenceLevel::Low);
    assert_eq!(result.pressure_rating, "Fair Value");
    assert!(!result.confidence_factors.is_empty());
}

#[test]
fn test_projected_item_reverts_to_value() {
    let (series, config) = projected_market();
    let result = predict(&series, &config, 42);

    assert_eq!(result.regime, MarketRegime::Gravity);
    assert_well_formed(&result, 30);
    let predicted: Vec<f64> = result.predicted.iter().map(|p| p.price).collect();
    assert!(predicted.windows(2).all(|w| w[1] < w[0]));
    assert!(predicted[0] < 10_000.0);
    assert!((predicted[29] - 3000.0).abs() < 150.0);
    for day in 0..30 {
        assert!(result.lower_band[day].price < predicted[day]);
        assert!(result.upper_band[day].price > predicted[day]);
    }
    // Inflated sales are the subject of the forecast, not outliers.
    assert_eq!(result.sanitized_count, 0);
}

#[test]
fn test_regime_selection() {
    let series = daily(&[500.0, 510.0, 505.0, 515.0, 520.0, 518.0]);

    let few = PredictionConfig { sellers: Some(2), ..Default::default() };
    assert_eq!(predict(&series, &few, 1).regime, MarketRegime::Inertia);

    let many = PredictionConfig { sellers: Some(50), ..Default::default() };
    assert_eq!(predict(&series, &many, 1).regime, MarketRegime::Flow);

    let projected = PredictionConfig { sellers: Some(50), is_projected: true, ..Default::default() };
    assert_eq!(predict(&series, &projected, 1).regime, MarketRegime::Gravity);
}

#[test]
fn test_short_history_soft_fails() {
    let series = daily(&[100.0, 101.0, 102.0, 103.0]);
    let result = predict(&series, &PredictionConfig::default(), 1);

    assert_eq!(result.confidence_score, 0);
    assert!(result.predicted.is_empty());
    assert!(result.upper_band.is_empty());
    assert!(result.lower_band.is_empty());
    assert_eq!(result.regime, MarketRegime::Inertia);
}

#[test]
fn test_zero_prices_do_not_count_as_history() {
    let series = daily(&[100.0, 0.0, 102.0, 0.0, 103.0, 104.0]);
    let result = predict(&series, &PredictionConfig::default(), 1);
    assert_eq!(result.confidence_score, 0);
    assert!(result.predicted.is_empty());
}

#[test]
fn test_snipes_are_removed_and_counted() {
    let series = daily(&[1000.0, 1020.0, 400.0, 1050.0, 990.0, 1010.0, 1030.0]);
    let config = PredictionConfig {
        sellers: Some(50),
        value: Some(1000.0),
        ..Default::default()
    };
    let result = predict(&series, &config, 5);

    assert_eq!(result.sanitized_count, 1);
    assert_eq!(result.snipe_count, 1);
    assert_well_formed(&result, 30);
}

#[test]
fn test_stale_reference_keeps_series() {
    // Every sale is far above the stale value, so the safety valve keeps them all.
    let series = daily(&[5000.0, 5100.0, 5050.0, 5200.0, 5150.0, 5300.0]);
    let config = PredictionConfig {
        sellers: Some(2),
        value: Some(1000.0),
        ..Default::default()
    };
    let result = predict(&series, &config, 5);
    assert_eq!(result.sanitized_count, 0);
    assert_well_formed(&result, 30);
}

#[test]
fn test_same_seed_same_result() {
    let (series, config) = rising_market();
    assert_eq!(predict(&series, &config, 9), predict(&series, &config, 9));
}

#[test]
fn test_forecast_starts_after_later_of_clock_and_history() {
    let (series, config) = rising_market();
    let last = series[series.len() - 1].time;
    let engine = engine();

    let later = last + 10 * SECONDS_PER_DAY;
    let result = engine
        .generate_full_prediction_at(&series, &config, later, &mut StdRng::seed_from_u64(1))
        .unwrap();
    assert_eq!(result.predicted[0].time, later + SECONDS_PER_DAY);

    let earlier = last - 10 * SECONDS_PER_DAY;
    let result = engine
        .generate_full_prediction_at(&series, &config, earlier, &mut StdRng::seed_from_u64(1))
        .unwrap();
    assert_eq!(result.predicted[0].time, last + SECONDS_PER_DAY);
}

#[test]
fn test_custom_horizon() {
    let (series, mut config) = rising_market();
    config.prediction_days = 7;
    assert_well_formed(&predict(&series, &config, 3), 7);
}

#[test]
fn test_unknown_sellers_defaults_to_flow() {
    let (series, mut config) = rising_market();
    config.sellers = None;
    let result = predict(&series, &config, 3);

    assert_eq!(result.regime, MarketRegime::Flow);
    // One sale a day: the wait for the next sale is a day.
    assert!((result.days_to_sell - 1.0).abs() < 1e-9);
}

#[test]
fn test_order_book_is_accepted() {
    let (series, mut config) = rising_market();
    config.order_book = [1100.0, 1180.0, 1400.0]
        .iter()
        .map(|&price| OrderBookEntry { price, seller_id: Some(1) })
        .collect();
    assert_well_formed(&predict(&series, &config, 3), 30);
}

#[test]
fn test_malformed_input_is_rejected() {
    let engine = engine();
    let mut rng = StdRng::seed_from_u64(1);

    let mut series = daily(&[100.0, 101.0, 102.0, 103.0, 104.0]);
    series[2].price = f64::NAN;
    let result = engine.generate_full_prediction(&series, &PredictionConfig::default(), &mut rng);
    assert!(matches!(result, Err(EngineError::InvalidInput(_))));

    let series = daily(&[100.0, 101.0, 102.0, 103.0, 104.0]);
    let bad_rating = PredictionConfig { demand: 7, ..Default::default() };
    let result = engine.generate_full_prediction(&series, &bad_rating, &mut rng);
    assert!(matches!(result, Err(EngineError::InvalidInput(_))));

    let no_horizon = PredictionConfig { prediction_days: 0, ..Default::default() };
    let result = engine.generate_full_prediction(&series, &no_horizon, &mut rng);
    assert!(matches!(result, Err(EngineError::InvalidInput(_))));
}

#[test]
fn test_oversized_horizon_is_rejected_before_forecasting() {
    let engine = engine();
    let mut rng = StdRng::seed_from_u64(1);
    let series = daily(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);

    for days in [MAX_PREDICTION_DAYS + 1, usize::MAX / 4] {
        let config = PredictionConfig { sellers: Some(2), prediction_days: days, ..Default::default() };
        let result = engine.generate_full_prediction(&series, &config, &mut rng);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    let config = PredictionConfig { sellers: Some(2), prediction_days: MAX_PREDICTION_DAYS, ..Default::default() };
    let result = engine.generate_full_prediction(&series, &config, &mut rng).unwrap();
    assert_eq!(result.predicted.len(), MAX_PREDICTION_DAYS);
}

#[test]
fn test_invalid_settings_are_rejected() {
    let mut settings = Config::default();
    settings.monte_carlo.paths = 0;
    assert!(matches!(
        PredictionEngine::new(settings),
        Err(EngineError::Configuration(_))
    ));
}

#[test]
fn test_convenience_wrappers_match_full_prediction() {
    let (series, config) = projected_market();
    let engine = engine();

    let full = engine
        .generate_full_prediction(&series, &config, &mut StdRng::seed_from_u64(4))
        .unwrap();
    let predicted = engine
        .generate_prediction(&series, &config, &mut StdRng::seed_from_u64(4))
        .unwrap();
    let bands = engine
        .generate_prediction_with_bands(&series, &config, &mut StdRng::seed_from_u64(4))
        .unwrap();

    assert_eq!(predicted, full.predicted);
    assert_eq!(bands, full.bands());
}
