use crate::error::ForecastError;
use crate::{flow, gravity, inertia, ForecastInput};
use core_types::{ForecastBands, MarketRegime};
use rand::RngCore;

/// The shared signature of every forecasting engine.
pub type ForecastFn = fn(&ForecastInput<'_>, &mut dyn RngCore) -> Result<ForecastBands, ForecastError>;

/// Returns the engine that models the given regime.
// The compiler will error if a new MarketRegime is added but not handled here.
pub fn engine_for(regime: MarketRegime) -> ForecastFn {
    match regime {
        MarketRegime::Flow => flow::forecast,
        MarketRegime::Inertia => inertia::forecast,
        MarketRegime::Gravity => gravity::forecast,
    }
}

/// Runs the regime's engine after checking the input can support a forecast.
pub fn run_forecast(
    regime: MarketRegime,
    input: &ForecastInput<'_>,
    rng: &mut dyn RngCore,
) -> Result<ForecastBands, ForecastError> {
    if input.series.is_empty() {
        return Err(ForecastError::NotEnoughData(
            "the price series is empty".to_string(),
        ));
    }
    if input.days() == 0 {
        return Ok(ForecastBands::default());
    }

    tracing::info!(%regime, points = input.series.len(), days = input.days(), "Running forecast engine.");
    let bands = engine_for(regime)(input, rng)?;
    tracing::debug!(
        first = bands.predicted.first().map(|p| p.price),
        last = bands.predicted.last().map(|p| p.price),
        "Forecast engine finished."
    );
    Ok(bands)
}
