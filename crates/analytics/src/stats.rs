use configuration::VolatilityParams;
use core_types::{DataQuality, MarketStats, PricePoint, SECONDS_PER_DAY};
use statrs::statistics::Statistics;

/// A stateless calculator for drift and volatility over irregularly sampled prices.
#[derive(Debug, Clone)]
pub struct StatisticsEngine {
    params: VolatilityParams,
}

impl StatisticsEngine {
    pub fn new(params: VolatilityParams) -> Self {
        Self { params }
    }

    /// The main entry point for deriving `MarketStats` from a sanitized series.
    pub fn calculate(&self, series: &[PricePoint]) -> MarketStats {
        let returns = self.normalized_returns(series);

        let drift = if returns.is_empty() {
            0.0
        } else {
            returns.iter().mean()
        };
        let volatility = self.garch_volatility(&returns);
        let avg_data_frequency = average_frequency(series);
        let data_quality = DataQuality::from_frequency(avg_data_frequency);

        tracing::debug!(
            drift,
            volatility,
            avg_data_frequency,
            %data_quality,
            samples = returns.len(),
            "Computed market statistics."
        );

        MarketStats {
            drift: if drift.is_finite() { drift } else { 0.0 },
            volatility,
            returns,
            avg_data_frequency,
            data_quality,
        }
    }

    /// Log returns scaled to a per-day rate by the time elapsed between observations.
    ///
    /// Pairs with a non-positive price or a non-increasing timestamp are skipped.
    /// Elapsed time is floored at `min_interval_days` so that two sales minutes apart
    /// do not explode into an enormous daily rate.
    pub fn normalized_returns(&self, series: &[PricePoint]) -> Vec<f64> {
        series
            .windows(2)
            .filter_map(|w| {
                let (a, b) = (&w[0], &w[1]);
                if a.price <= 0.0 || b.price <= 0.0 || b.time <= a.time {
                    return None;
                }
                let days = (b.time - a.time) as f64 / SECONDS_PER_DAY as f64;
                let r = (b.price / a.price).ln() / days.max(self.params.min_interval_days);
                r.is_finite().then_some(r)
            })
            .collect()
    }

    /// GARCH(1,1) volatility, blended with the unconditional long-term level.
    ///
    /// `omega` is derived from the sample variance, so the long-run variance of the
    /// recursion equals the sample variance. Never returns less than `volatility_floor`.
    pub fn garch_volatility(&self, returns: &[f64]) -> f64 {
        let floor = self.params.volatility_floor;
        let sample_variance = match returns.len() {
            0 => return floor,
            1 => returns[0] * returns[0],
            _ => returns.iter().variance(),
        };
        if !sample_variance.is_finite() {
            return floor;
        }

        let alpha = self.params.garch_alpha;
        let beta = self.params.garch_beta;
        let omega = sample_variance * (1.0 - alpha - beta);

        let mut variance = sample_variance;
        for r in returns {
            variance = omega + alpha * r * r + beta * variance;
        }

        let long_term_variance = omega / (1.0 - alpha - beta);
        let weight = self.params.current_weight;
        let volatility =
            weight * variance.max(0.0).sqrt() + (1.0 - weight) * long_term_variance.max(0.0).sqrt();

        if volatility.is_finite() {
            volatility.max(floor)
        } else {
            floor
        }
    }
}

/// Average spacing between observations in days; 1.0 when it cannot be measured.
pub fn average_frequency(series: &[PricePoint]) -> f64 {
    let span_days = span_days(series);
    if series.len() < 2 || span_days <= 0.0 {
        return 1.0;
    }
    span_days / (series.len() - 1) as f64
}

/// Days between the first and last observation.
pub fn span_days(series: &[PricePoint]) -> f64 {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => (last.time - first.time) as f64 / SECONDS_PER_DAY as f64,
        _ => 0.0,
    }
}
