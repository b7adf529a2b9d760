use configuration::SanitizerParams;
use core_types::PricePoint;

/// Which filters the sanitizer applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeMode {
    /// Remove both snipes and extreme outliers.
    Full,
    /// Remove snipes only. Used when the elevated prices are the signal being modeled.
    SnipesOnly,
}

/// The cleaned series and what was taken out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedSeries {
    pub points: Vec<PricePoint>,
    /// Total number of points removed.
    pub removed: usize,
    /// How many of the removed points were snipes.
    pub snipes: usize,
}

impl SanitizedSeries {
    fn untouched(series: &[PricePoint]) -> Self {
        Self {
            points: series.to_vec(),
            removed: 0,
            snipes: 0,
        }
    }
}

/// Removes snipe and outlier transactions using a reference price.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    params: SanitizerParams,
}

impl Sanitizer {
    pub fn new(params: SanitizerParams) -> Self {
        Self { params }
    }

    /// Filters `series` against `reference` (the community value, or the last price).
    ///
    /// If more than `max_removal_fraction` of the points would go, the reference is
    /// presumed stale and the series is returned unchanged.
    pub fn sanitize(
        &self,
        series: &[PricePoint],
        reference: Option<f64>,
        mode: SanitizeMode,
    ) -> SanitizedSeries {
        let reference = match reference {
            Some(r) if r.is_finite() && r > 0.0 => r,
            _ => return SanitizedSeries::untouched(series),
        };
        if series.is_empty() {
            return SanitizedSeries::untouched(series);
        }

        let snipe_floor = reference * self.params.snipe_ratio;
        let outlier_ceiling = reference * self.params.outlier_ratio;

        let mut points = Vec::with_capacity(series.len());
        let mut snipes = 0;
        let mut outliers = 0;

        for point in series {
            if point.price < snipe_floor {
                snipes += 1;
            } else if mode == SanitizeMode::Full && point.price > outlier_ceiling {
                outliers += 1;
            } else {
                points.push(point.clone());
            }
        }

        let removed = snipes + outliers;
        let removed_fraction = removed as f64 / series.len() as f64;
        if removed_fraction > self.params.max_removal_fraction {
            tracing::warn!(
                removed,
                total = series.len(),
                reference,
                "Sanitizer would discard most of the series; keeping it unchanged."
            );
            return SanitizedSeries::untouched(series);
        }

        if removed > 0 {
            tracing::debug!(snipes, outliers, reference, "Removed noisy transactions.");
        }

        SanitizedSeries {
            points,
            removed,
            snipes,
        }
    }
}
