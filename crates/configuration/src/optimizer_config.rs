use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The search space for Holt-Winters smoothing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoltWintersGrid {
    /// Level smoothing factor.
    pub alpha: ParameterRange,
    /// Trend smoothing factor.
    pub beta: ParameterRange,
}

impl Default for HoltWintersGrid {
    fn default() -> Self {
        Self {
            alpha: ParameterRange::LinearDecimal {
                start: dec!(0.1),
                end: dec!(0.9),
                step: dec!(0.1),
            },
            beta: ParameterRange::LinearDecimal {
                start: dec!(0.05),
                end: dec!(0.5),
                step: dec!(0.05),
            },
        }
    }
}

impl HoltWintersGrid {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.alpha.validate("holt_winters.alpha")?;
        self.beta.validate("holt_winters.beta")
    }
}

/// Represents a range of values for a single parameter to be tested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterRange {
    DiscreteDecimal(Vec<Decimal>),
    LinearDecimal { start: Decimal, end: Decimal, step: Decimal },
}

impl ParameterRange {
    /// Smoothing factors must lie in the open unit interval.
    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let in_unit = |v: &Decimal| *v > Decimal::ZERO && *v < Decimal::ONE;
        match self {
            ParameterRange::DiscreteDecimal(values) => {
                if values.is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "{} must list at least one value",
                        name
                    )));
                }
                if !values.iter().all(in_unit) {
                    return Err(ConfigError::ValidationError(format!(
                        "every value of {} must be in (0, 1)",
                        name
                    )));
                }
            }
            ParameterRange::LinearDecimal { start, end, step } => {
                if step.is_sign_negative() || step.is_zero() {
                    return Err(ConfigError::ValidationError(format!(
                        "Step for '{}' must be positive.",
                        name
                    )));
                }
                if start > end || !in_unit(start) || !in_unit(end) {
                    return Err(ConfigError::ValidationError(format!(
                        "{} must satisfy 0 < start <= end < 1",
                        name
                    )));
                }
            }
        }
        Ok(())
    }
}
