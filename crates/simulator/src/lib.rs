//! # Augur Monte Carlo Simulator
//!
//! Generates Geometric Brownian Motion price paths with fat-tailed shocks and reduces
//! them to per-day percentile bands.
//!
//! Randomness is always injected by the caller. Each path gets its own generator seeded
//! from the injected one, in path order, before any path is simulated. Paths can then
//! run on the `rayon` pool in any order and the result is still identical for a given
//! seed.

use configuration::MonteCarloParams;
use core_types::MIN_PRICE;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

pub mod error;
pub mod shock;

pub use error::SimulationError;
pub use shock::Shock;

/// The starting point and dynamics of one simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationInput {
    pub last_price: f64,
    /// Daily log drift.
    pub drift: f64,
    /// Daily volatility.
    pub volatility: f64,
    /// Extra daily drift from sentiment, decayed geometrically over the horizon.
    pub sentiment_drift: f64,
    pub days: usize,
}

/// Per-day percentiles across all simulated paths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PercentilePaths {
    pub lower: Vec<f64>,
    pub median: Vec<f64>,
    pub upper: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    params: MonteCarloParams,
    shock: Shock,
}

impl MonteCarloSimulator {
    pub fn new(params: MonteCarloParams) -> Result<Self, SimulationError> {
        if params.paths == 0 {
            return Err(SimulationError::InvalidParameters(
                "at least one path is required".to_string(),
            ));
        }
        let shock = if params.fat_tails {
            Shock::fat_tailed(params.degrees_of_freedom)?
        } else {
            Shock::standard_normal()?
        };
        Ok(Self { params, shock })
    }

    pub fn params(&self) -> &MonteCarloParams {
        &self.params
    }

    /// Runs every path and extracts the lower/median/upper percentiles for each day.
    pub fn simulate<R: RngCore + ?Sized>(
        &self,
        input: &SimulationInput,
        rng: &mut R,
    ) -> Result<PercentilePaths, SimulationError> {
        validate(input)?;
        if input.days == 0 {
            return Ok(PercentilePaths::default());
        }

        let seeds: Vec<u64> = (0..self.params.paths).map(|_| rng.next_u64()).collect();
        let paths: Vec<Vec<f64>> = seeds
            .par_iter()
            .map(|&seed| self.simulate_path(input, seed))
            .collect();

        let mut bands = PercentilePaths {
            lower: Vec::with_capacity(input.days),
            median: Vec::with_capacity(input.days),
            upper: Vec::with_capacity(input.days),
        };
        let mut column = Vec::with_capacity(paths.len());
        for day in 0..input.days {
            column.clear();
            column.extend(paths.iter().map(|path| path[day]));
            column.sort_by(|a, b| a.total_cmp(b));

            bands.lower.push(percentile(&column, self.params.lower_percentile));
            bands.median.push(percentile(&column, 0.5));
            bands.upper.push(percentile(&column, self.params.upper_percentile));
        }

        tracing::debug!(
            paths = self.params.paths,
            days = input.days,
            final_median = bands.median[input.days - 1],
            "Monte Carlo simulation complete."
        );
        Ok(bands)
    }

    fn simulate_path(&self, input: &SimulationInput, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let vol = input.volatility;
        let base_drift = input.drift - 0.5 * vol * vol;

        let mut price = input.last_price;
        let mut sentiment = input.sentiment_drift;
        let mut path = Vec::with_capacity(input.days);
        for _ in 0..input.days {
            let shock = self.shock.sample(&mut rng);
            let log_return = base_drift + sentiment + vol * shock;
            price = (price * log_return.exp()).max(MIN_PRICE);
            if !price.is_finite() {
                price = f64::MAX;
            }
            path.push(price);
            sentiment *= self.params.sentiment_decay;
        }
        path
    }
}

fn validate(input: &SimulationInput) -> Result<(), SimulationError> {
    if !(input.last_price.is_finite() && input.last_price > 0.0) {
        return Err(SimulationError::InvalidParameters(format!(
            "last price must be positive and finite, got {}",
            input.last_price
        )));
    }
    if !(input.drift.is_finite() && input.sentiment_drift.is_finite()) {
        return Err(SimulationError::InvalidParameters(
            "drift terms must be finite".to_string(),
        ));
    }
    if !(input.volatility.is_finite() && input.volatility >= 0.0) {
        return Err(SimulationError::InvalidParameters(format!(
            "volatility must be non-negative and finite, got {}",
            input.volatility
        )));
    }
    Ok(())
}

/// Linearly interpolated percentile of an ascending slice. `p` is in [0, 1].
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulator(fat_tails: bool) -> MonteCarloSimulator {
        MonteCarloSimulator::new(MonteCarloParams {
            fat_tails,
            ..Default::default()
        })
        .unwrap()
    }

    fn input(drift: f64, volatility: f64) -> SimulationInput {
        SimulationInput {
            last_price: 100.0,
            drift,
            volatility,
            sentiment_drift: 0.0,
            days: 30,
        }
    }

    #[test]
    fn test_zero_drift_zero_volatility_is_flat() {
        let mut rng = StdRng::seed_from_u64(1);
        let bands = simulator(true).simulate(&input(0.0, 0.0), &mut rng).unwrap();

        assert_eq!(bands.median.len(), 30);
        for day in 0..30 {
            assert_eq!(bands.lower[day], 100.0);
            assert_eq!(bands.median[day], 100.0);
            assert_eq!(bands.upper[day], 100.0);
        }
    }

    #[test]
    fn test_same_seed_same_paths() {
        let sim = simulator(true);
        let a = sim.simulate(&input(0.001, 0.03), &mut StdRng::seed_from_u64(99)).unwrap();
        let b = sim.simulate(&input(0.001, 0.03), &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_percentiles_are_ordered_and_floored() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut crash = input(-0.5, 0.4);
        crash.last_price = 3.0;
        let bands = simulator(false).simulate(&crash, &mut rng).unwrap();

        for day in 0..crash.days {
            assert!(bands.lower[day] <= bands.median[day]);
            assert!(bands.median[day] <= bands.upper[day]);
            assert!(bands.lower[day] >= 1.0);
        }
    }

    #[test]
    fn test_bands_widen_over_time() {
        let mut rng = StdRng::seed_from_u64(3);
        let bands = simulator(true).simulate(&input(0.0, 0.05), &mut rng).unwrap();

        let early = bands.upper[0] - bands.lower[0];
        let late = bands.upper[29] - bands.lower[29];
        assert!(late > early);
    }

    #[test]
    fn test_sentiment_lifts_the_median() {
        let sim = simulator(false);
        let neutral = sim.simulate(&input(0.0, 0.02), &mut StdRng::seed_from_u64(8)).unwrap();

        let mut hyped = input(0.0, 0.02);
        hyped.sentiment_drift = 0.01;
        let hyped = sim.simulate(&hyped, &mut StdRng::seed_from_u64(8)).unwrap();

        assert!(hyped.median[29] > neutral.median[29]);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut bad = input(0.0, 0.01);
        bad.last_price = 0.0;
        assert!(simulator(true).simulate(&bad, &mut rng).is_err());

        let bad = input(0.0, f64::NAN);
        assert!(simulator(true).simulate(&bad, &mut rng).is_err());
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&sorted, 0.5), 3.0);
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 1.0), 5.0);
        assert!((percentile(&sorted, 0.1) - 1.4).abs() < 1e-12);
    }
}
