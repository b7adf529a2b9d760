pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ConfidenceLevel, DataQuality, LiquidityRating, MarketRegime, PressureDirection};
pub use error::CoreError;
pub use structs::{
    ForecastBands, MarketStats, OrderBookEntry, PredictionConfig, PredictionResult, PricePoint,
    validate_series, MAX_PREDICTION_DAYS, MIN_PRICE, SECONDS_PER_DAY, UNRATED,
};
