use crate::stats::span_days;
use core_types::{LiquidityRating, MarketStats, PressureDirection, PricePoint};
use serde::{Deserialize, Serialize};

/// Lower bound on average daily volume used when estimating time to sell.
pub const MIN_DAILY_VOLUME: f64 = 0.1;

/// RAP/Value ratio above which the asset is considered undervalued.
pub const UNDERVALUED_RATIO: f64 = 1.15;
pub const STRONGLY_UNDERVALUED_RATIO: f64 = 1.3;
/// RAP/Value ratio below which the asset is considered overvalued.
pub const OVERVALUED_RATIO: f64 = 0.85;
pub const STRONGLY_OVERVALUED_RATIO: f64 = 0.7;
/// Divergence from parity that maps to full pressure magnitude.
const FULL_PRESSURE_DIVERGENCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liquidity {
    pub days_to_sell: f64,
    pub rating: LiquidityRating,
}

/// Average units traded per day.
///
/// Uses reported volumes when any point carries one; otherwise every observation
/// counts as a single sale.
pub fn average_daily_volume(series: &[PricePoint], stats: &MarketStats) -> f64 {
    let reported: Vec<f64> = series.iter().filter_map(|p| p.volume).collect();
    if reported.is_empty() {
        return 1.0 / stats.avg_data_frequency.max(f64::EPSILON);
    }
    let total: f64 = reported.iter().sum();
    total / span_days(series).max(1.0)
}

/// Estimates how long the current supply takes to clear.
///
/// With an unknown seller count the expected wait for the next sale is used instead.
pub fn liquidity(sellers: Option<u32>, series: &[PricePoint], stats: &MarketStats) -> Liquidity {
    let days_to_sell = match sellers {
        Some(count) => {
            let volume = average_daily_volume(series, stats).max(MIN_DAILY_VOLUME);
            count as f64 / volume
        }
        None => stats.avg_data_frequency,
    };

    Liquidity {
        days_to_sell,
        rating: LiquidityRating::from_days_to_sell(days_to_sell),
    }
}

/// How far recent trading (RAP) has diverged from the community value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPressure {
    pub ratio: Option<f64>,
    pub direction: PressureDirection,
    pub label: String,
    /// Strength of the pressure in [0, 1].
    pub magnitude: f64,
}

pub fn pricing_pressure(rap: Option<f64>, value: Option<f64>) -> PricingPressure {
    let ratio = match (rap, value) {
        (Some(rap), Some(value)) if rap > 0.0 && value > 0.0 => rap / value,
        _ => {
            return PricingPressure {
                ratio: None,
                direction: PressureDirection::Neutral,
                label: "Unknown".to_string(),
                magnitude: 0.0,
            };
        }
    };

    let (direction, label) = if ratio > STRONGLY_UNDERVALUED_RATIO {
        (PressureDirection::Up, "Strongly Undervalued")
    } else if ratio > UNDERVALUED_RATIO {
        (PressureDirection::Up, "Undervalued")
    } else if ratio < STRONGLY_OVERVALUED_RATIO {
        (PressureDirection::Down, "Strongly Overvalued")
    } else if ratio < OVERVALUED_RATIO {
        (PressureDirection::Down, "Overvalued")
    } else {
        (PressureDirection::Neutral, "Fair Value")
    };

    let magnitude = match direction {
        PressureDirection::Neutral => 0.0,
        _ => ((ratio - 1.0).abs() / FULL_PRESSURE_DIVERGENCE).min(1.0),
    };

    PricingPressure {
        ratio: Some(ratio),
        direction,
        label: label.to_string(),
        magnitude,
    }
}
