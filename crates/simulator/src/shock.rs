use crate::error::SimulationError;
use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::{Normal, StudentsT};

/// The distribution daily shocks are drawn from. Both variants have unit variance.
#[derive(Debug, Clone)]
pub enum Shock {
    /// Fat-tailed Student's t, rescaled so its variance is 1.
    StudentT(StudentsT),
    Normal(Normal),
}

impl Shock {
    /// A Student's t with `freedom` degrees of freedom, scaled by `sqrt((v - 2) / v)`.
    pub fn fat_tailed(freedom: f64) -> Result<Self, SimulationError> {
        if freedom <= 2.0 {
            return Err(SimulationError::InvalidParameters(format!(
                "Student's t needs more than 2 degrees of freedom for a finite variance, got {}",
                freedom
            )));
        }
        let scale = ((freedom - 2.0) / freedom).sqrt();
        let dist = StudentsT::new(0.0, scale, freedom)
            .map_err(|e| SimulationError::Distribution(e.to_string()))?;
        Ok(Shock::StudentT(dist))
    }

    pub fn standard_normal() -> Result<Self, SimulationError> {
        let dist =
            Normal::new(0.0, 1.0).map_err(|e| SimulationError::Distribution(e.to_string()))?;
        Ok(Shock::Normal(dist))
    }
}

impl Distribution<f64> for Shock {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Shock::StudentT(dist) => dist.sample(rng),
            Shock::Normal(dist) => dist.sample(rng),
        }
    }
}
