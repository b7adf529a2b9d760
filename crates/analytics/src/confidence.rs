use crate::metrics::Liquidity;
use crate::report::ConfidenceReport;
use core_types::{DataQuality, LiquidityRating, MarketRegime, MarketStats};

const BASE_SCORE: i32 = 50;

/// History lengths that earn a bonus or a penalty.
pub const LONG_HISTORY_POINTS: usize = 30;
pub const SHORT_HISTORY_POINTS: usize = 10;

/// Daily volatility thresholds used for liquid markets.
pub const CALM_VOLATILITY: f64 = 0.02;
pub const WILD_VOLATILITY: f64 = 0.08;

/// Absolute daily sentiment drift treated as a strong signal.
pub const STRONG_SENTIMENT: f64 = 0.004;

/// Everything the confidence score is derived from.
#[derive(Debug, Clone)]
pub struct ConfidenceInputs<'a> {
    pub regime: MarketRegime,
    pub stats: &'a MarketStats,
    /// Number of points the forecast was fitted on.
    pub history_len: usize,
    pub liquidity: &'a Liquidity,
    /// Combined demand and trend drift, per day.
    pub sentiment_drift: f64,
    /// False when neither demand nor trend has been rated.
    pub has_sentiment: bool,
}

/// A stateless scorer that turns forecast context into an explainable confidence.
#[derive(Debug, Default)]
pub struct ConfidenceCalculator {}

impl ConfidenceCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calculate(&self, inputs: &ConfidenceInputs<'_>) -> ConfidenceReport {
        let mut score = BASE_SCORE;
        let mut factors = Vec::new();
        let mut adjust = |delta: i32, factor: String| {
            score += delta;
            factors.push(factor);
        };

        // --- Regime ---
        match inputs.regime {
            MarketRegime::Flow => adjust(10, "Liquid market: supply and demand models apply (+10)".to_string()),
            MarketRegime::Inertia => adjust(-10, "Illiquid market: few sellers, last sale anchors price (-10)".to_string()),
            MarketRegime::Gravity => adjust(5, "Projected item: reversion toward value is predictable (+5)".to_string()),
        }

        // --- Data quality and quantity ---
        match inputs.stats.data_quality {
            DataQuality::High => adjust(10, "Frequent price updates (+10)".to_string()),
            DataQuality::Medium => {}
            DataQuality::Low => adjust(-10, "Sparse price updates (-10)".to_string()),
        }

        if inputs.history_len >= LONG_HISTORY_POINTS {
            adjust(10, format!("Long price history: {} points (+10)", inputs.history_len));
        } else if inputs.history_len < SHORT_HISTORY_POINTS {
            adjust(-10, format!("Short price history: {} points (-10)", inputs.history_len));
        }

        // --- Liquidity ---
        // A projected item's price is driven by the correction, not by how fast it sells.
        if inputs.regime != MarketRegime::Gravity {
            let days = inputs.liquidity.days_to_sell;
            match inputs.liquidity.rating {
                LiquidityRating::Fast => adjust(10, format!("Sells fast: ~{:.1} days (+10)", days)),
                LiquidityRating::Moderate => adjust(5, format!("Moderate liquidity: ~{:.1} days (+5)", days)),
                LiquidityRating::Slow => adjust(-5, format!("Slow to sell: ~{:.1} days (-5)", days)),
                LiquidityRating::Illiquid => adjust(-10, format!("Illiquid: ~{:.1} days to sell (-10)", days)),
            }
        }

        // --- Volatility ---
        if inputs.regime == MarketRegime::Flow {
            let vol = inputs.stats.volatility;
            if vol < CALM_VOLATILITY {
                adjust(5, format!("Low volatility: {:.1}%/day (+5)", vol * 100.0));
            } else if vol > WILD_VOLATILITY {
                adjust(-10, format!("High volatility: {:.1}%/day (-10)", vol * 100.0));
            }
        }

        // --- Sentiment ---
        if !inputs.has_sentiment {
            adjust(-5, "No demand or trend rating (-5)".to_string());
        } else if inputs.sentiment_drift.abs() >= STRONG_SENTIMENT {
            adjust(5, "Strong demand/trend signal (+5)".to_string());
        }

        let report = ConfidenceReport::new(score, factors);
        tracing::debug!(score = report.score, level = %report.level, "Scored forecast confidence.");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ConfidenceLevel;

    fn stats(quality: DataQuality, volatility: f64) -> MarketStats {
        MarketStats {
            drift: 0.0,
            volatility,
            returns: Vec::new(),
            avg_data_frequency: 1.0,
            data_quality: quality,
        }
    }

    fn liquidity(rating: LiquidityRating) -> Liquidity {
        Liquidity { days_to_sell: 1.0, rating }
    }

    #[test]
    fn test_every_adjustment_is_explained() {
        let stats = stats(DataQuality::High, 0.01);
        let liquidity = liquidity(LiquidityRating::Fast);
        let report = ConfidenceCalculator::new().calculate(&ConfidenceInputs {
            regime: MarketRegime::Flow,
            stats: &stats,
            history_len: 40,
            liquidity: &liquidity,
            sentiment_drift: 0.01,
            has_sentiment: true,
        });

        // 50 + 10 regime + 10 quality + 10 history + 10 liquidity + 5 volatility + 5 sentiment
        assert_eq!(report.score, 90);
        assert_eq!(report.factors.len(), 6);
        assert_eq!(report.level, ConfidenceLevel::High);
    }

    #[test]
    fn test_score_is_clamped_at_floor() {
        let stats = stats(DataQuality::Low, 0.01);
        let liquidity = liquidity(LiquidityRating::Illiquid);
        let report = ConfidenceCalculator::new().calculate(&ConfidenceInputs {
            regime: MarketRegime::Inertia,
            stats: &stats,
            history_len: 6,
            liquidity: &liquidity,
            sentiment_drift: 0.0,
            has_sentiment: false,
        });

        // 50 - 10 - 10 - 10 - 10 - 5 = 5, clamped to 10.
        assert_eq!(report.score, 10);
        assert_eq!(report.level, ConfidenceLevel::Low);
    }

    #[test]
    fn test_gravity_ignores_liquidity_and_volatility() {
        let stats = stats(DataQuality::Medium, 0.5);
        let liquidity = liquidity(LiquidityRating::Illiquid);
        let report = ConfidenceCalculator::new().calculate(&ConfidenceInputs {
            regime: MarketRegime::Gravity,
            stats: &stats,
            history_len: 15,
            liquidity: &liquidity,
            sentiment_drift: 0.001,
            has_sentiment: true,
        });

        assert_eq!(report.score, 55);
        assert_eq!(report.factors.len(), 1);
        assert_eq!(report.level, ConfidenceLevel::Medium);
    }
}
