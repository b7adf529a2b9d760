use core_types::{MarketRegime, PredictionConfig};

/// More sellers than this makes a market liquid enough for supply/demand models.
pub const FLOW_MIN_SELLERS: u32 = 10;

/// At or below this many sellers an inertia market gets the wide band cap.
pub const ILLIQUID_SELLERS: u32 = 3;

/// Classifies the market. A projection always wins; an unknown seller count is
/// treated as a liquid market.
pub fn detect_regime(config: &PredictionConfig) -> MarketRegime {
    if config.is_projected {
        return MarketRegime::Gravity;
    }
    match config.sellers {
        None => MarketRegime::Flow,
        Some(sellers) if sellers > FLOW_MIN_SELLERS => MarketRegime::Flow,
        Some(_) => MarketRegime::Inertia,
    }
}

/// True when an item has so few sellers that its price can jump on a single sale.
pub fn is_illiquid(config: &PredictionConfig) -> bool {
    config.sellers.is_some_and(|sellers| sellers <= ILLIQUID_SELLERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(sellers: Option<u32>, is_projected: bool) -> PredictionConfig {
        PredictionConfig {
            sellers,
            is_projected,
            ..Default::default()
        }
    }

    #[test]
    fn test_projection_takes_priority() {
        assert_eq!(detect_regime(&config(Some(50), true)), MarketRegime::Gravity);
        assert_eq!(detect_regime(&config(None, true)), MarketRegime::Gravity);
    }

    #[test]
    fn test_seller_thresholds() {
        assert_eq!(detect_regime(&config(Some(50), false)), MarketRegime::Flow);
        assert_eq!(detect_regime(&config(Some(11), false)), MarketRegime::Flow);
        assert_eq!(detect_regime(&config(Some(10), false)), MarketRegime::Inertia);
        assert_eq!(detect_regime(&config(Some(2), false)), MarketRegime::Inertia);
    }

    #[test]
    fn test_unknown_sellers_is_flow() {
        assert_eq!(detect_regime(&config(None, false)), MarketRegime::Flow);
    }

    #[test]
    fn test_illiquid_threshold() {
        assert!(is_illiquid(&config(Some(3), false)));
        assert!(!is_illiquid(&config(Some(4), false)));
        assert!(!is_illiquid(&config(None, false)));
    }
}
