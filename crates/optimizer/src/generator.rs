use crate::error::OptimizerError;
use crate::SmoothingParams;
use configuration::{HoltWintersGrid, ParameterRange};
use itertools::Itertools;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Expands one parameter range into its concrete values.
///
/// Linear ranges are stepped in `Decimal`, so `0.1 + 0.1 + 0.1` lands on `0.3` exactly
/// and the end of the range is never skipped by accumulated rounding.
pub fn expand_range(name: &str, range: &ParameterRange) -> Result<Vec<Decimal>, OptimizerError> {
    let values = match range {
        ParameterRange::DiscreteDecimal(vals) => vals.clone(),
        ParameterRange::LinearDecimal { start, end, step } => {
            if step.is_sign_negative() || step.is_zero() {
                return Err(OptimizerError::ParameterGeneration(format!(
                    "Step for '{}' must be positive.",
                    name
                )));
            }
            let mut vals = Vec::new();
            let mut current = *start;
            while current <= *end {
                vals.push(current);
                current += *step;
            }
            vals
        }
    };

    if values.is_empty() {
        return Err(OptimizerError::ParameterGeneration(format!(
            "Range for '{}' produced no values.",
            name
        )));
    }
    Ok(values)
}

/// Generates every (alpha, beta) combination of the Holt-Winters search grid.
///
/// Alpha varies slowest, so the grid order is stable for a given configuration.
pub fn generate_grid(grid: &HoltWintersGrid) -> Result<Vec<SmoothingParams>, OptimizerError> {
    let alphas = expand_range("alpha", &grid.alpha)?;
    let betas = expand_range("beta", &grid.beta)?;

    alphas
        .iter()
        .cartesian_product(betas.iter())
        .map(|(alpha, beta)| {
            Ok(SmoothingParams {
                alpha: to_f64(alpha)?,
                beta: to_f64(beta)?,
            })
        })
        .collect()
}

fn to_f64(value: &Decimal) -> Result<f64, OptimizerError> {
    value.to_f64().ok_or_else(|| {
        OptimizerError::ParameterGeneration(format!("{} cannot be represented as f64", value))
    })
}
