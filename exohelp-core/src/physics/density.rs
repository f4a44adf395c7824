//! Bulk density from mass and radius.

use super::{require_non_negative, require_positive, DomainError};
use crate::units::{LengthUnit, MassUnit, Measure};
use std::f64::consts::PI;

/// Bulk density in g/cm³ of a uniform sphere.
///
/// Plain numbers are read as Earth masses and Earth radii; tagged quantities
/// are converted first. Fails for a negative mass or a non-positive radius.
///
/// ```
/// use exohelp_core::physics::bulk_density;
/// let earth = bulk_density(1.0, 1.0).unwrap();
/// assert!((earth - 5.49).abs() < 0.01);
/// ```
pub fn bulk_density(
    mass: impl Into<Measure<MassUnit>>,
    radius: impl Into<Measure<LengthUnit>>,
) -> Result<f64, DomainError> {
    let grams = require_non_negative("mass", mass.into().resolve(MassUnit::Gram))?;
    let centimeters = require_positive("radius", radius.into().resolve(LengthUnit::Centimeter))?;

    let volume = 4.0 / 3.0 * PI * centimeters.powi(3);
    Ok(grams / volume)
}
