//! Minimum planet mass from a single-planet radial-velocity solution.
//!
//! `M_p sin i = C · K · √(1 − e²) · M★^(2/3) · P^(1/3) / sin i` where the
//! constant `C` folds in G, the solar and Earth masses, and the day length so
//! that K is in m/s, P in days, M★ in solar masses and the result in Earth
//! masses.

use super::{require_non_negative, require_positive, DomainError};
use crate::constants::{
    EARTH_MASS_KG, EARTH_TO_JUPITER_MASS, GRAVITATIONAL_CONSTANT, SECONDS_PER_DAY, SOLAR_MASS_KG,
};
use crate::units::{AngleUnit, MassUnit, Measure, TimeUnit, VelocityUnit};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::sync::OnceLock;

/// Earth masses per (m/s · day^(1/3)) for a one-solar-mass host.
pub fn min_mass_prefactor() -> f64 {
    static PREFACTOR: OnceLock<f64> = OnceLock::new();
    *PREFACTOR.get_or_init(|| {
        (2.0 * PI * GRAVITATIONAL_CONSTANT).powf(-1.0 / 3.0)
            * SOLAR_MASS_KG.powf(2.0 / 3.0)
            * SECONDS_PER_DAY.powf(1.0 / 3.0)
            / EARTH_MASS_KG
    })
}

/// Unit the minimum mass is reported in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MassOutput {
    #[default]
    Earth,
    Jupiter,
}

/// Orbital solution for one planet.
///
/// Plain-number defaults: semi-amplitude in m/s, period in days, stellar
/// mass in solar masses, inclination in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RvParameters {
    pub semi_amplitude: Measure<VelocityUnit>,
    pub period: Measure<TimeUnit>,
    pub eccentricity: f64,
    pub stellar_mass: Measure<MassUnit>,
    pub inclination: Measure<AngleUnit>,
}

impl RvParameters {
    /// Circular, edge-on orbit around a one-solar-mass star.
    pub fn new(
        semi_amplitude: impl Into<Measure<VelocityUnit>>,
        period: impl Into<Measure<TimeUnit>>,
    ) -> Self {
        Self {
            semi_amplitude: semi_amplitude.into(),
            period: period.into(),
            eccentricity: 0.0,
            stellar_mass: Measure::Plain(1.0),
            inclination: Measure::Plain(90.0),
        }
    }

    pub fn with_eccentricity(mut self, eccentricity: f64) -> Self {
        self.eccentricity = eccentricity;
        self
    }

    pub fn with_stellar_mass(mut self, stellar_mass: impl Into<Measure<MassUnit>>) -> Self {
        self.stellar_mass = stellar_mass.into();
        self
    }

    pub fn with_inclination(mut self, inclination: impl Into<Measure<AngleUnit>>) -> Self {
        self.inclination = inclination.into();
        self
    }
}

/// Minimum planet mass (M sin i) for one orbital solution.
///
/// ```
/// use exohelp_core::physics::{planet_mass, MassOutput, RvParameters};
/// use exohelp_core::units::{Quantity, TimeUnit, VelocityUnit};
///
/// let params = RvParameters::new(
///     Quantity::new(8.95, VelocityUnit::CentimetersPerSecond),
///     Quantity::new(1.0, TimeUnit::Year),
/// );
/// let mass = planet_mass(&params, MassOutput::Earth).unwrap();
/// assert_eq!(format!("{mass:.1}"), "1.0");
/// ```
pub fn planet_mass(params: &RvParameters, output: MassOutput) -> Result<f64, DomainError> {
    let k = require_non_negative(
        "radial velocity semi-amplitude",
        params.semi_amplitude.resolve(VelocityUnit::MetersPerSecond),
    )?;
    let period = require_positive("orbital period", params.period.resolve(TimeUnit::Day))?;
    let stellar_mass = require_positive(
        "stellar mass",
        params.stellar_mass.resolve(MassUnit::SolarMass),
    )?;

    let e = params.eccentricity;
    if !(0.0..1.0).contains(&e) {
        return Err(DomainError::Eccentricity(e));
    }

    let degrees = params.inclination.resolve(AngleUnit::Degree);
    let sin_i = degrees.to_radians().sin();
    if !sin_i.is_finite() || sin_i <= 1e-12 {
        return Err(DomainError::Inclination { degrees });
    }

    let earth_masses = min_mass_prefactor()
        * k
        * (1.0 - e * e).sqrt()
        * stellar_mass.powf(2.0 / 3.0)
        * period.powf(1.0 / 3.0)
        / sin_i;

    Ok(match output {
        MassOutput::Earth => earth_masses,
        MassOutput::Jupiter => earth_masses * EARTH_TO_JUPITER_MASS,
    })
}

/// Element-wise [`planet_mass`]; fails on the first invalid solution.
pub fn planet_masses(params: &[RvParameters], output: MassOutput) -> Result<Vec<f64>, DomainError> {
    params.iter().map(|p| planet_mass(p, output)).collect()
}
