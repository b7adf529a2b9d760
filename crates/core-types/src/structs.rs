use crate::enums::{
    ConfidenceLevel, DataQuality, LiquidityRating, MarketRegime, PressureDirection,
};
use crate::error::CoreError;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

pub const SECONDS_PER_DAY: i64 = 86_400;

/// The lowest price any forecast is allowed to emit.
pub const MIN_PRICE: f64 = 1.0;

/// A single observed (or forecast) transaction price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub price: f64,
    /// Unix timestamp in seconds.
    pub time: i64,
    #[serde(default)]
    pub display_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PricePoint {
    /// Creates a point at `time` with a short `Mon DD` display label.
    pub fn at(time: i64, price: f64) -> Self {
        Self {
            price,
            time,
            display_date: display_date(time),
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }
}

fn display_date(time: i64) -> String {
    DateTime::from_timestamp(time, 0)
        .map(|dt| dt.format("%b %d").to_string())
        .unwrap_or_default()
}

/// One seller listing from the order-book snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookEntry {
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<u64>,
}

/// Market fundamentals supplied alongside the price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionConfig {
    /// Number of active sellers. `None` when the data source does not report it.
    #[serde(default)]
    pub sellers: Option<u32>,
    /// Demand rating from -1 (unrated) to 4 (amazing).
    #[serde(default = "unrated")]
    pub demand: i8,
    /// Trend rating from -1 (unrated) to 4.
    #[serde(default = "unrated")]
    pub trend: i8,
    /// Recent Average Price.
    #[serde(default)]
    pub rap: Option<f64>,
    /// Community-assessed value.
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub is_projected: bool,
    #[serde(default)]
    pub order_book: Vec<OrderBookEntry>,
    #[serde(default = "default_prediction_days")]
    pub prediction_days: usize,
}

pub const UNRATED: i8 = -1;
pub const MAX_RATING: i8 = 4;
pub const DEFAULT_PREDICTION_DAYS: usize = 30;
/// Longest horizon a single forecast may request.
pub const MAX_PREDICTION_DAYS: usize = 365;

fn unrated() -> i8 {
    UNRATED
}

fn default_prediction_days() -> usize {
    DEFAULT_PREDICTION_DAYS
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            sellers: None,
            demand: UNRATED,
            trend: UNRATED,
            rap: None,
            value: None,
            is_projected: false,
            order_book: Vec::new(),
            prediction_days: DEFAULT_PREDICTION_DAYS,
        }
    }
}

impl PredictionConfig {
    /// Rejects configurations that cannot be interpreted numerically.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, rating) in [("demand", self.demand), ("trend", self.trend)] {
            if !(UNRATED..=MAX_RATING).contains(&rating) {
                return Err(CoreError::InvalidInput(
                    name.to_string(),
                    format!("rating {} is outside {}..={}", rating, UNRATED, MAX_RATING),
                ));
            }
        }

        if !(1..=MAX_PREDICTION_DAYS).contains(&self.prediction_days) {
            return Err(CoreError::InvalidInput(
                "prediction_days".to_string(),
                format!(
                    "horizon {} is outside 1..={} days",
                    self.prediction_days, MAX_PREDICTION_DAYS
                ),
            ));
        }

        for (name, amount) in [("rap", self.rap), ("value", self.value)] {
            if let Some(v) = amount {
                if !v.is_finite() || v <= 0.0 {
                    return Err(CoreError::InvalidInput(
                        name.to_string(),
                        format!("expected a positive finite number, got {}", v),
                    ));
                }
            }
        }

        if let Some(entry) = self.order_book.iter().find(|e| !e.price.is_finite()) {
            return Err(CoreError::InvalidInput(
                "order_book".to_string(),
                format!("listing price {} is not finite", entry.price),
            ));
        }

        Ok(())
    }

    /// Whether either sentiment rating carries information.
    pub fn has_sentiment(&self) -> bool {
        self.demand != UNRATED || self.trend != UNRATED
    }
}

/// Checks that a historical series only contains finite numbers.
///
/// Zero or negative prices and non-increasing timestamps are tolerated here; the
/// statistics layer skips them. Only values that cannot be used at all are rejected.
pub fn validate_series(series: &[PricePoint]) -> Result<(), CoreError> {
    for (i, point) in series.iter().enumerate() {
        if !point.price.is_finite() {
            return Err(CoreError::InvalidInput(
                format!("series[{}].price", i),
                format!("{} is not a finite number", point.price),
            ));
        }
        if let Some(volume) = point.volume {
            if !volume.is_finite() || volume < 0.0 {
                return Err(CoreError::InvalidInput(
                    format!("series[{}].volume", i),
                    format!("expected a non-negative finite number, got {}", volume),
                ));
            }
        }
    }
    Ok(())
}

/// Summary statistics derived from a sanitized price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    /// Mean time-normalized daily log return.
    pub drift: f64,
    /// Daily volatility of log returns.
    pub volatility: f64,
    pub returns: Vec<f64>,
    /// Average spacing between observations, in days.
    pub avg_data_frequency: f64,
    pub data_quality: DataQuality,
}

/// The three aligned output sequences every forecasting engine produces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastBands {
    pub predicted: Vec<PricePoint>,
    pub upper_band: Vec<PricePoint>,
    pub lower_band: Vec<PricePoint>,
}

impl ForecastBands {
    /// Assembles daily points starting one day after `anchor`.
    ///
    /// Every price is floored at [`MIN_PRICE`] and the bands are widened where needed so
    /// that `lower <= predicted <= upper` holds at each index.
    pub fn build(
        anchor: i64,
        predicted: &[f64],
        upper: &[f64],
        lower: &[f64],
    ) -> Result<Self, CoreError> {
        if predicted.len() != upper.len() || predicted.len() != lower.len() {
            return Err(CoreError::Calculation(format!(
                "forecast sequences differ in length (predicted {}, upper {}, lower {})",
                predicted.len(),
                upper.len(),
                lower.len()
            )));
        }

        let mut bands = ForecastBands {
            predicted: Vec::with_capacity(predicted.len()),
            upper_band: Vec::with_capacity(predicted.len()),
            lower_band: Vec::with_capacity(predicted.len()),
        };

        for (i, ((&mid, &hi), &lo)) in predicted.iter().zip(upper).zip(lower).enumerate() {
            if !(mid.is_finite() && hi.is_finite() && lo.is_finite()) {
                return Err(CoreError::Calculation(format!(
                    "non-finite forecast value on day {}",
                    i + 1
                )));
            }
            let mid = mid.max(MIN_PRICE);
            let hi = hi.max(mid);
            let lo = lo.max(MIN_PRICE).min(mid);
            let time = anchor + (i as i64 + 1) * SECONDS_PER_DAY;

            bands.predicted.push(PricePoint::at(time, mid));
            bands.upper_band.push(PricePoint::at(time, hi));
            bands.lower_band.push(PricePoint::at(time, lo));
        }

        Ok(bands)
    }

    pub fn len(&self) -> usize {
        self.predicted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicted.is_empty()
    }
}

/// The complete forecast returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub predicted: Vec<PricePoint>,
    pub upper_band: Vec<PricePoint>,
    pub lower_band: Vec<PricePoint>,
    /// 0 to 100.
    pub confidence_score: u8,
    pub confidence_level: ConfidenceLevel,
    /// Human-readable reasons behind the confidence score.
    pub confidence_factors: Vec<String>,
    pub liquidity_rating: LiquidityRating,
    pub days_to_sell: f64,
    pub pressure_rating: String,
    pub pressure_direction: PressureDirection,
    pub regime: MarketRegime,
    /// Number of points removed by the sanitizer.
    pub sanitized_count: usize,
    /// Number of removed points that were snipes.
    pub snipe_count: usize,
}

impl PredictionResult {
    /// The soft-fail result returned when there is not enough history to forecast.
    pub fn empty() -> Self {
        Self {
            predicted: Vec::new(),
            upper_band: Vec::new(),
            lower_band: Vec::new(),
            confidence_score: 0,
            confidence_level: ConfidenceLevel::Low,
            confidence_factors: vec!["Insufficient price history".to_string()],
            liquidity_rating: LiquidityRating::Illiquid,
            days_to_sell: 0.0,
            pressure_rating: "Unknown".to_string(),
            pressure_direction: PressureDirection::Neutral,
            regime: MarketRegime::Inertia,
            sanitized_count: 0,
            snipe_count: 0,
        }
    }

    pub fn bands(&self) -> ForecastBands {
        ForecastBands {
            predicted: self.predicted.clone(),
            upper_band: self.upper_band.clone(),
            lower_band: self.lower_band.clone(),
        }
    }
}
