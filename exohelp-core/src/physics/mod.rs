//! Closed-form derived quantities: bulk density and radial-velocity minimum mass.

pub mod density;
pub mod rv;

pub use density::bulk_density;
pub use rv::{min_mass_prefactor, planet_mass, planet_masses, MassOutput, RvParameters};

use thiserror::Error;

/// Physically invalid input to a formula.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("{quantity} must be positive and finite, got {value}")]
    NotPositive { quantity: &'static str, value: f64 },

    #[error("{quantity} must be non-negative and finite, got {value}")]
    Negative { quantity: &'static str, value: f64 },

    #[error("eccentricity must lie in [0, 1), got {0}")]
    Eccentricity(f64),

    #[error("inclination of {degrees} deg has no positive sine; minimum mass is undefined")]
    Inclination { degrees: f64 },
}

pub(crate) fn require_positive(quantity: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DomainError::NotPositive { quantity, value })
    }
}

pub(crate) fn require_non_negative(quantity: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DomainError::Negative { quantity, value })
    }
}
