use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of market an asset trades in, which decides the forecasting model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketRegime {
    /// Many competing sellers; supply/demand dynamics and technical analysis apply.
    Flow,
    /// Few sellers; the last sale price is the market.
    Inertia,
    /// Artificially inflated price expected to revert to its real value.
    Gravity,
}

impl fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarketRegime::Flow => "FLOW",
            MarketRegime::Inertia => "INERTIA",
            MarketRegime::Gravity => "GRAVITY",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    High,
    Medium,
    Low,
}

impl DataQuality {
    /// Classifies a series by its average spacing between observations, in days.
    pub fn from_frequency(avg_days: f64) -> Self {
        if avg_days <= 1.5 {
            DataQuality::High
        } else if avg_days <= 7.0 {
            DataQuality::Medium
        } else {
            DataQuality::Low
        }
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataQuality::High => "high",
            DataQuality::Medium => "medium",
            DataQuality::Low => "low",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidityRating {
    Fast,
    Moderate,
    Slow,
    Illiquid,
}

impl LiquidityRating {
    pub fn from_days_to_sell(days: f64) -> Self {
        if days <= 1.0 {
            LiquidityRating::Fast
        } else if days <= 3.0 {
            LiquidityRating::Moderate
        } else if days <= 7.0 {
            LiquidityRating::Slow
        } else {
            LiquidityRating::Illiquid
        }
    }
}

impl fmt::Display for LiquidityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LiquidityRating::Fast => "fast",
            LiquidityRating::Moderate => "moderate",
            LiquidityRating::Slow => "slow",
            LiquidityRating::Illiquid => "illiquid",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressureDirection {
    Up,
    Neutral,
    Down,
}

impl PressureDirection {
    /// Returns +1, 0 or -1 for use as a drift multiplier.
    pub fn sign(&self) -> f64 {
        match self {
            PressureDirection::Up => 1.0,
            PressureDirection::Neutral => 0.0,
            PressureDirection::Down => -1.0,
        }
    }
}

impl fmt::Display for PressureDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PressureDirection::Up => "up",
            PressureDirection::Neutral => "neutral",
            PressureDirection::Down => "down",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= 70 {
            ConfidenceLevel::High
        } else if score >= 45 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        };
        f.write_str(name)
    }
}
