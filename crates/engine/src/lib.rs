//! # Augur Prediction Engine
//!
//! The single entry point of the forecasting system. `PredictionEngine` validates the
//! input, cleans the series, picks the market regime, runs that regime's engine and
//! assembles the forecast together with its liquidity, pricing pressure and confidence.
//!
//! The engine is stateless between calls; the only randomness is the generator the
//! caller passes in.

use analytics::{
    liquidity, pricing_pressure, ConfidenceCalculator, ConfidenceInputs, SanitizeMode, Sanitizer,
    StatisticsEngine,
};
use chrono::Utc;
use configuration::Config;
use core_types::{
    validate_series, ForecastBands, MarketRegime, PredictionConfig, PredictionResult, PricePoint,
};
use forecasters::{detect_regime, run_forecast, sentiment, ForecastInput};
use rand::RngCore;

pub mod error;

pub use error::EngineError;

/// The fewest usable observations that produce a forecast.
pub const MIN_HISTORY_POINTS: usize = 5;

/// The central orchestrator of the forecasting pipeline.
#[derive(Debug)]
pub struct PredictionEngine {
    settings: Config,
    sanitizer: Sanitizer,
    statistics: StatisticsEngine,
    confidence: ConfidenceCalculator,
}

impl PredictionEngine {
    /// Creates an engine from validated settings.
    pub fn new(settings: Config) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(Self {
            sanitizer: Sanitizer::new(settings.sanitizer.clone()),
            statistics: StatisticsEngine::new(settings.volatility.clone()),
            confidence: ConfidenceCalculator::new(),
            settings,
        })
    }

    pub fn settings(&self) -> &Config {
        &self.settings
    }

    /// Produces the full forecast, counting forecast days from the current time.
    pub fn generate_full_prediction<R: RngCore>(
        &self,
        series: &[PricePoint],
        config: &PredictionConfig,
        rng: &mut R,
    ) -> Result<PredictionResult, EngineError> {
        self.generate_full_prediction_at(series, config, Utc::now().timestamp(), rng)
    }

    /// Produces the full forecast with an explicit clock.
    ///
    /// The first forecast day is one day after the later of `now` and the last observed
    /// sale. Fewer than `MIN_HISTORY_POINTS` usable prices yield
    /// [`PredictionResult::empty`] rather than an error.
    #[tracing::instrument(
        name = "prediction",
        skip_all,
        fields(points = series.len(), days = config.prediction_days)
    )]
    pub fn generate_full_prediction_at<R: RngCore>(
        &self,
        series: &[PricePoint],
        config: &PredictionConfig,
        now: i64,
        rng: &mut R,
    ) -> Result<PredictionResult, EngineError> {
        validate_series(series)?;
        config.validate()?;

        let usable: Vec<PricePoint> = series.iter().filter(|p| p.price > 0.0).cloned().collect();
        let Some(last_time) = usable.last().map(|p| p.time) else {
            tracing::info!("No usable prices; returning an empty forecast.");
            return Ok(PredictionResult::empty());
        };
        if usable.len() < MIN_HISTORY_POINTS {
            tracing::info!(
                usable = usable.len(),
                required = MIN_HISTORY_POINTS,
                "Not enough price history; returning an empty forecast."
            );
            return Ok(PredictionResult::empty());
        }

        // --- 1. Regime ---
        let regime = detect_regime(config);
        tracing::info!(%regime, sellers = ?config.sellers, "Detected market regime.");

        // --- 2. Sanitize ---
        let mode = match regime {
            MarketRegime::Gravity => SanitizeMode::SnipesOnly,
            _ => SanitizeMode::Full,
        };
        let reference = config.value.or_else(|| usable.last().map(|p| p.price));
        let cleaned = self.sanitizer.sanitize(&usable, reference, mode);
        let (history, sanitized_count, snipe_count) = if cleaned.points.len() < MIN_HISTORY_POINTS {
            tracing::warn!(
                kept = cleaned.points.len(),
                "Sanitizing left too little history; using the unsanitized series."
            );
            (usable, 0, 0)
        } else {
            (cleaned.points, cleaned.removed, cleaned.snipes)
        };

        // --- 3. Statistics ---
        let stats = self.statistics.calculate(&history);

        // --- 4. Forecast ---
        let input = ForecastInput {
            series: &history,
            config,
            stats: &stats,
            settings: &self.settings,
            anchor: now.max(last_time),
        };
        let bands = run_forecast(regime, &input, rng)?;

        // --- 5. Metrics ---
        let liquidity = liquidity(config.sellers, &history, &stats);
        let pressure = pricing_pressure(config.rap, config.value);
        let report = self.confidence.calculate(&ConfidenceInputs {
            regime,
            stats: &stats,
            history_len: history.len(),
            liquidity: &liquidity,
            sentiment_drift: sentiment::sentiment_drift(config),
            has_sentiment: config.has_sentiment(),
        });

        tracing::info!(
            %regime,
            confidence = report.score,
            liquidity = %liquidity.rating,
            pressure = %pressure.label,
            sanitized_count,
            "Prediction complete."
        );

        Ok(PredictionResult {
            predicted: bands.predicted,
            upper_band: bands.upper_band,
            lower_band: bands.lower_band,
            confidence_score: report.score,
            confidence_level: report.level,
            confidence_factors: report.factors,
            liquidity_rating: liquidity.rating,
            days_to_sell: liquidity.days_to_sell,
            pressure_rating: pressure.label,
            pressure_direction: pressure.direction,
            regime,
            sanitized_count,
            snipe_count,
        })
    }

    /// The predicted path only.
    pub fn generate_prediction<R: RngCore>(
        &self,
        series: &[PricePoint],
        config: &PredictionConfig,
        rng: &mut R,
    ) -> Result<Vec<PricePoint>, EngineError> {
        Ok(self.generate_full_prediction(series, config, rng)?.predicted)
    }

    /// The predicted path with its confidence bands.
    pub fn generate_prediction_with_bands<R: RngCore>(
        &self,
        series: &[PricePoint],
        config: &PredictionConfig,
        rng: &mut R,
    ) -> Result<ForecastBands, EngineError> {
        Ok(self.generate_full_prediction(series, config, rng)?.bands())
    }
}
